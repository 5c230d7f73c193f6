use std::error::Error;
use std::sync::Arc;

use jni::objects::{GlobalRef, JObject, JObjectArray, JString, JThrowable, JValue};
use jni::sys::jobject;
use jni::{JNIEnv, JavaVM};

use super::{PlatformError, TorchPlatform};

/// `android.hardware.camera2.CameraManager` reached over JNI.
#[derive(Clone)]
pub struct AndroidTorch {
    vm: Arc<JavaVM>,
    camera_manager: GlobalRef,
}

impl AndroidTorch {
    pub fn new() -> Result<Self, Box<dyn Error>> {
        let vm = Arc::new(unsafe { JavaVM::from_raw(ndk_context::android_context().vm().cast())? });

        let camera_manager = {
            let mut env = vm.attach_current_thread()?;

            let ctx_ptr = ndk_context::android_context().context();
            if ctx_ptr.is_null() {
                return Err("Failed to get Android context".into());
            }
            let context = unsafe { JObject::from_raw(ctx_ptr as jobject) };

            let manager = checked(&mut env, |env| {
                let camera_service = env
                    .get_static_field("android/content/Context", "CAMERA_SERVICE", "Ljava/lang/String;")?
                    .l()?;
                env.call_method(
                    &context,
                    "getSystemService",
                    "(Ljava/lang/String;)Ljava/lang/Object;",
                    &[JValue::Object(&camera_service)],
                )?
                .l()
            })?;
            if manager.is_null() {
                return Err("CameraManager service not available".into());
            }
            env.new_global_ref(manager)?
        };

        Ok(Self{vm, camera_manager})
    }

    fn camera_ids_impl(&self) -> Result<Vec<String>, Box<dyn Error>> {
        let mut env = self.vm.attach_current_thread()?;
        checked(&mut env, |env| {
            let list = env
                .call_method(self.camera_manager.as_obj(), "getCameraIdList", "()[Ljava/lang/String;", &[])?
                .l()?;
            let list = JObjectArray::from(list);
            let len = env.get_array_length(&list)?;
            let mut ids = Vec::with_capacity(len as usize);
            for i in 0..len {
                let id = JString::from(env.get_object_array_element(&list, i)?);
                ids.push(env.get_string(&id)?.into());
            }
            Ok(ids)
        })
    }

    fn has_flash_impl(&self, id: &str) -> Result<bool, Box<dyn Error>> {
        let mut env = self.vm.attach_current_thread()?;
        checked(&mut env, |env| {
            let camera_id = env.new_string(id)?;
            let characteristics = env
                .call_method(
                    self.camera_manager.as_obj(),
                    "getCameraCharacteristics",
                    "(Ljava/lang/String;)Landroid/hardware/camera2/CameraCharacteristics;",
                    &[JValue::Object(&camera_id)],
                )?
                .l()?;
            let key = env
                .get_static_field(
                    "android/hardware/camera2/CameraCharacteristics",
                    "FLASH_INFO_AVAILABLE",
                    "Landroid/hardware/camera2/CameraCharacteristics$Key;",
                )?
                .l()?;
            let available = env
                .call_method(
                    &characteristics,
                    "get",
                    "(Landroid/hardware/camera2/CameraCharacteristics$Key;)Ljava/lang/Object;",
                    &[JValue::Object(&key)],
                )?
                .l()?;

            // Boxed Boolean; null means the camera does not report the key.
            if available.is_null() {
                return Ok(false);
            }
            env.call_method(&available, "booleanValue", "()Z", &[])?.z()
        })
    }

    fn set_torch_mode_impl(&self, id: &str, on: bool) -> Result<(), Box<dyn Error>> {
        let mut env = self.vm.attach_current_thread()?;
        checked(&mut env, |env| {
            let camera_id = env.new_string(id)?;
            env.call_method(
                self.camera_manager.as_obj(),
                "setTorchMode",
                "(Ljava/lang/String;Z)V",
                &[JValue::Object(&camera_id), JValue::Bool(on.into())],
            )?;
            Ok(())
        })
    }
}

/// Runs a group of JNI calls. If any of them left a Java exception pending,
/// it is cleared before returning and reported by its `toString()`, so the
/// attached thread can keep making JNI calls.
fn checked<'local, T>(
    env: &mut JNIEnv<'local>,
    calls: impl FnOnce(&mut JNIEnv<'local>) -> jni::errors::Result<T>,
) -> Result<T, Box<dyn Error>> {
    let error = match calls(env) {
        Ok(value) => return Ok(value),
        Err(e) => e,
    };
    if !env.exception_check()? {
        return Err(error.into());
    }
    let exception = env.exception_occurred()?;
    env.exception_clear()?;
    match describe(env, &exception) {
        Ok(text) => Err(text.into()),
        Err(_) => {
            env.exception_clear()?;
            Err(error.into())
        }
    }
}

fn describe(env: &mut JNIEnv, exception: &JThrowable) -> jni::errors::Result<String> {
    let text = env.call_method(exception, "toString", "()Ljava/lang/String;", &[])?.l()?;
    Ok(env.get_string(&JString::from(text))?.into())
}

impl TorchPlatform for AndroidTorch {
    fn camera_ids(&mut self) -> Result<Vec<String>, PlatformError> {
        self.camera_ids_impl().map_err(PlatformError::new)
    }

    fn has_flash(&mut self, id: &str) -> Result<bool, PlatformError> {
        self.has_flash_impl(id).map_err(PlatformError::new)
    }

    fn set_torch_mode(&mut self, id: &str, on: bool) -> Result<(), PlatformError> {
        self.set_torch_mode_impl(id, on).map_err(PlatformError::new)
    }
}
