//! Auth, header, and body application

use crate::connector::{AuthMode, Connector};
use crate::error::{Error, Result};
use crate::types::{JsonObject, JsonValue, OptionStringExt};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use reqwest::header;
use reqwest::RequestBuilder;

/// Value of the Authorization header for this connector, if any.
///
/// A supplied token is used verbatim for either scheme. Without one, both
/// Basic and Bearer fall back to the same base64 `username:password`
/// credential token.
pub fn authorization(connector: &Connector) -> Result<Option<String>> {
    match connector.auth {
        AuthMode::None => Ok(None),
        AuthMode::Basic => Ok(Some(format!("Basic {}", auth_token(connector)?))),
        AuthMode::Bearer => Ok(Some(format!("Bearer {}", auth_token(connector)?))),
    }
}

fn auth_token(connector: &Connector) -> Result<String> {
    if let Some(token) = connector.token.clone().none_if_empty() {
        return Ok(token);
    }

    let username = connector.username.clone().none_if_empty();
    let password = connector.password.clone().none_if_empty();

    match (username, password) {
        (Some(username), Some(password)) => Ok(basic_credentials(&username, &password)),
        _ => Err(Error::invalid_request("credentials or token required")),
    }
}

/// Base64 credential token for `username:password`
pub fn basic_credentials(username: &str, password: &str) -> String {
    BASE64.encode(format!("{username}:{password}"))
}

/// Apply auth, default headers, and the accept flag to a request builder.
///
/// Default headers are added verbatim and additively: duplicate names are
/// permitted and all occurrences are sent.
pub fn dress(
    connector: &Connector,
    mut req: RequestBuilder,
    accept_json: bool,
) -> Result<RequestBuilder> {
    if let Some(value) = authorization(connector)? {
        req = req.header(header::AUTHORIZATION, value);
    }

    for h in &connector.headers {
        req = req.header(h.name.as_str(), h.value.as_str());
    }

    if accept_json {
        req = req.header(header::ACCEPT, "application/json");
    }

    Ok(req)
}

/// Merge the connector's configured properties into a JSON body.
///
/// With no configured properties the body passes through (a null body means
/// no content). Otherwise a null body is treated as an empty object, the
/// body must be an object, and a property whose key already exists in the
/// caller body is a collision error, never a silent overwrite.
pub fn extend_body(connector: &Connector, body: Option<JsonValue>) -> Result<Option<JsonValue>> {
    if connector.body_properties.is_empty() {
        return Ok(body.filter(|v| !v.is_null()));
    }

    let mut map = match body.unwrap_or(JsonValue::Null) {
        JsonValue::Null => JsonObject::new(),
        JsonValue::Object(map) => map,
        other => {
            return Err(Error::invalid_request(format!(
                "body must be a JSON object to merge properties, got {other}"
            )))
        }
    };

    for prop in &connector.body_properties {
        if map.contains_key(&prop.name) {
            return Err(Error::invalid_request(format!(
                "configured body property '{}' collides with a caller body key",
                prop.name
            )));
        }
        map.insert(prop.name.clone(), JsonValue::String(prop.value.clone()));
    }

    Ok(Some(JsonValue::Object(map)))
}
