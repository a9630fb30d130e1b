//! Calls into loosely typed JS objects
//!
//! Host objects are probed by name at call time. A missing method becomes
//! [`HostError::Unsupported`], a thrown exception or rejected promise becomes
//! [`HostError::Rejected`].

use icondock_model::{Capability, HostError, HostResult};
use js_sys::{Array, Function, Promise, Reflect};
use serde::de::DeserializeOwned;
use serde::Serialize;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;

/// Method `name` on `target`, if it is a function
pub fn method(target: &JsValue, name: &str) -> Option<Function> {
    Reflect::get(target, &JsValue::from_str(name))
        .ok()?
        .dyn_into::<Function>()
        .ok()
}

/// Property `name` on `target`, if it is an object
pub fn object(target: &JsValue, name: &str) -> Option<JsValue> {
    Reflect::get(target, &JsValue::from_str(name))
        .ok()
        .filter(JsValue::is_object)
}

/// Call `target[name](...args)` and await the result when it is a promise
pub async fn call(
    target: &JsValue,
    capability: Capability,
    name: &str,
    args: &[JsValue],
) -> HostResult<JsValue> {
    let function = method(target, name).ok_or(HostError::Unsupported(capability))?;
    let args: Array = args.iter().collect();
    let value = function
        .apply(target, &args)
        .map_err(|err| HostError::rejected(capability, describe(&err)))?;
    match value.dyn_into::<Promise>() {
        Ok(promise) => JsFuture::from(promise)
            .await
            .map_err(|err| HostError::rejected(capability, describe(&err))),
        Err(value) => Ok(value),
    }
}

/// Decode a JS value; `null` and `undefined` decode to the default
pub fn decode<T: DeserializeOwned + Default>(value: &JsValue, capability: Capability) -> HostResult<T> {
    if value.is_null() || value.is_undefined() {
        return Ok(T::default());
    }
    serde_wasm_bindgen::from_value(value.clone())
        .map_err(|err| HostError::malformed(capability, err.to_string()))
}

/// Encode a Rust value as plain JS objects and arrays
pub fn encode<T: Serialize + ?Sized>(value: &T, capability: Capability) -> HostResult<JsValue> {
    let serializer = serde_wasm_bindgen::Serializer::json_compatible();
    value
        .serialize(&serializer)
        .map_err(|err| HostError::malformed(capability, err.to_string()))
}

/// Best readable text for a thrown JS value
pub fn describe(err: &JsValue) -> String {
    err.as_string()
        .or_else(|| {
            Reflect::get(err, &JsValue::from_str("message"))
                .ok()
                .and_then(|message| message.as_string())
        })
        .unwrap_or_else(|| format!("{err:?}"))
}
