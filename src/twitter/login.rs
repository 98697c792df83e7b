//! Web onboarding login flow.
//!
//! Activate a guest token, open a `login` flow, then answer one subtask per
//! round trip until the server stops asking. The session cookies land in the
//! transport's jar along the way.

use log::info;
use serde_json::{Value, json};

use crate::{
    api::client::HttpClient,
    config::Config,
    error::ApiError,
    twitter::endpoints::{GUEST_ACTIVATE, ONBOARDING_TASK},
};

const MAX_STEPS: usize = 16;
const SUCCESS: &str = "LoginSuccessSubtask";

pub(crate) async fn run<H: HttpClient>(api: &mut H, config: &Config) -> Result<(), ApiError> {
    let guest = api.post_json(GUEST_ACTIVATE, &json!({})).await?;
    let guest_token = guest
        .get("guest_token")
        .and_then(Value::as_str)
        .ok_or_else(|| ApiError::shape("guest_token missing from activation response"))?;
    api.set_guest_token(Some(guest_token.to_string()));

    let start = format!("{ONBOARDING_TASK}?flow_name=login");
    let mut flow = api.post_json(&start, &start_flow()).await?;

    for _ in 0..MAX_STEPS {
        let Some(subtask) = next_subtask(&flow) else {
            break;
        };
        if subtask == SUCCESS {
            break;
        }

        info!("login step: {subtask}");
        let body = json!({
            "flow_token": flow_token(&flow)?,
            "subtask_inputs": [subtask_input(&subtask, config)?],
        });
        flow = api.post_json(ONBOARDING_TASK, &body).await?;
    }

    api.set_guest_token(None);

    if api.export_cookies().get("auth_token").is_none() {
        return Err(ApiError::LoginFailed {
            reason: "no session cookie was issued".to_string(),
        });
    }
    info!("login complete");

    Ok(())
}

fn start_flow() -> Value {
    json!({
        "input_flow_data": {
            "flow_context": {
                "debug_overrides": {},
                "start_location": {"location": "splash_screen"}
            }
        },
        "subtask_versions": {}
    })
}

fn flow_token(flow: &Value) -> Result<String, ApiError> {
    flow.get("flow_token")
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| ApiError::shape("flow_token missing from onboarding response"))
}

fn next_subtask(flow: &Value) -> Option<String> {
    flow.pointer("/subtasks/0/subtask_id")
        .and_then(Value::as_str)
        .map(str::to_string)
}

/// The answer for one onboarding subtask.
pub(crate) fn subtask_input(subtask: &str, config: &Config) -> Result<Value, ApiError> {
    let input = match subtask {
        "LoginJsInstrumentationSubtask" => json!({
            "subtask_id": subtask,
            "js_instrumentation": {"response": "{}", "link": "next_link"}
        }),
        "LoginEnterUserIdentifierSSO" => json!({
            "subtask_id": subtask,
            "settings_list": {
                "setting_responses": [{
                    "key": "user_identifier",
                    "response_data": {"text_data": {"result": config.username}}
                }],
                "link": "next_link"
            }
        }),
        "LoginEnterAlternateIdentifierSubtask" | "LoginAcid" => json!({
            "subtask_id": subtask,
            "enter_text": {"text": config.email, "link": "next_link"}
        }),
        "LoginEnterPassword" => json!({
            "subtask_id": subtask,
            "enter_password": {"password": config.password, "link": "next_link"}
        }),
        "AccountDuplicationCheck" => json!({
            "subtask_id": subtask,
            "check_logged_in_account": {"link": "AccountDuplicationCheck_false"}
        }),
        "DenyLoginSubtask" => {
            return Err(ApiError::LoginFailed {
                reason: "the account was denied login".to_string(),
            });
        }
        other => {
            return Err(ApiError::UnsupportedSubtask {
                subtask: other.to_string(),
            });
        }
    };

    Ok(input)
}
