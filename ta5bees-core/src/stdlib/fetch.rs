use std::rc::Rc;

use serde_json::Value as JsonValue;

use crate::{
    environment::prelude::{Properties, Scope, Value, NULL},
    eval::prelude::{Deferred, EvalResult, RuntimeError, RuntimeErrorType}
};

use super::{invalid_argument, object, string_argument};

/// Status line and body of a finished GET request.
struct RawResponse {
    status: u16,
    body: String,
}

/// `jeeb(url)`: pending value resolving to `{ status, ok, json(), text() }`.
/// Error statuses still resolve; only transport failures reject.
pub fn jeeb(arguments: Vec<Value>, _scope: &Scope) -> EvalResult {
    let url = string_argument("jeeb", &arguments, 0)?.to_string();

    Ok(Value::Pending(Deferred::spawn(async move {
        log::debug!("fetching {url}");

        let response = tokio::task::spawn_blocking(move || get(&url))
            .await
            .map_err(|err| RuntimeError::new(RuntimeErrorType::Host { message: err.to_string() }))??;

        Ok(response_object(response))
    })))
}

fn get(url: &str) -> Result<RawResponse, RuntimeError> {
    let response = match ureq::get(url).call() {
        Ok(response) => response,
        Err(ureq::Error::Status(_, response)) => response,
        Err(err) => return Err(network_error(err.to_string()))
    };

    let status = response.status();
    let body = response.into_string().map_err(|err| network_error(err.to_string()))?;

    Ok(RawResponse { status, body })
}

fn network_error(message: String) -> RuntimeError {
    RuntimeError::new(RuntimeErrorType::Network { message })
}

fn response_object(response: RawResponse) -> Value {
    let body: Rc<str> = response.body.into();
    let text_body = body.clone();

    object(vec![
        ("status", Value::number(response.status as f64)),
        ("ok", Value::boolean((200..300).contains(&response.status))),
        ("json", Value::native("json", move |_arguments, _scope| {
            serde_json::from_str::<JsonValue>(&body)
                .map(|json| json_to_value(&json))
                .map_err(|err| invalid_argument("json", format!("invalid JSON body: {err}")))
        })),
        ("text", Value::native("text", move |_arguments, _scope| {
            Ok(Value::string(&*text_body))
        })),
    ])
}

pub fn json_to_value(json: &JsonValue) -> Value {
    match json {
        JsonValue::Null => NULL,
        JsonValue::Bool(value) => Value::boolean(*value),
        JsonValue::Number(number) => Value::number(number.as_f64().unwrap_or_default()),
        JsonValue::String(value) => Value::string(value.clone()),
        JsonValue::Array(values) => Value::array(values.iter().map(json_to_value).collect()),
        JsonValue::Object(map) => Value::object(Properties::from_iter(
            map.iter().map(|(key, value)| (key.clone(), json_to_value(value)))
        )),
    }
}
