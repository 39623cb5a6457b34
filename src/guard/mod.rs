use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use rocket::async_trait;
use rocket::http::Status;
use rocket::request::{FromRequest, Outcome};
use rocket::serde::json::serde_json;
use rocket::Request;

/// the authenticated caller of a request, carrying the stable opaque id every
/// folder and file row is scoped by.
///
/// Token signatures are checked by the fronting gateway before a request ever
/// reaches this server; all this guard does is pull the subject out of the
/// credential's payload.
#[derive(Debug)]
pub struct Owner {
    pub id: String,
}

#[derive(Debug, PartialEq)]
pub enum AuthError {
    Missing,
    Invalid,
}

impl Owner {
    /// creates an `Owner` from the passed header value.
    /// The value must be a bearer credential in jwt form; the subject claim
    /// becomes the owner id
    pub fn from(header: &str) -> Result<Owner, AuthError> {
        // remove the "Bearer " from the header, leaving only the token
        let token = header.to_string().replace("Bearer", "");
        let token = token.trim();
        let parts = token.split('.').collect::<Vec<&str>>();
        if parts.len() != 3 {
            return Err(AuthError::Invalid);
        }
        let payload = match URL_SAFE_NO_PAD.decode(parts[1]) {
            Ok(payload) => payload,
            Err(_) => return Err(AuthError::Invalid),
        };
        let claims: serde_json::Value = match serde_json::from_slice(payload.as_slice()) {
            Ok(claims) => claims,
            Err(_) => return Err(AuthError::Invalid),
        };
        match claims.get("sub").and_then(|sub| sub.as_str()) {
            Some(sub) if !sub.is_empty() => Ok(Owner {
                id: String::from(sub),
            }),
            _ => Err(AuthError::Invalid),
        }
    }
}

#[async_trait]
impl<'a> FromRequest<'a> for Owner {
    type Error = AuthError;

    async fn from_request(request: &'a Request<'_>) -> Outcome<Self, Self::Error> {
        match request.headers().get_one("Authorization") {
            None => Outcome::Error((Status::Unauthorized, AuthError::Missing)),
            Some(value) if value.starts_with("Bearer") => match Owner::from(value) {
                Ok(owner) => Outcome::Success(owner),
                Err(e) => Outcome::Error((Status::Unauthorized, e)),
            },
            Some(_) => Outcome::Error((Status::Unauthorized, AuthError::Invalid)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_valid_token() {
        // payload is {"sub":"test-owner"}
        let input = "Bearer eyJhbGciOiJSUzI1NiIsInR5cCI6IkpXVCJ9.eyJzdWIiOiJ0ZXN0LW93bmVyIn0.sig";
        let output = Owner::from(input).unwrap();
        assert_eq!("test-owner", output.id);
    }

    #[test]
    fn test_from_token_without_subject() {
        // payload is {"aud":"x"}
        let input = "Bearer eyJhbGciOiJSUzI1NiIsInR5cCI6IkpXVCJ9.eyJhdWQiOiJ4In0.sig";
        assert_eq!(AuthError::Invalid, Owner::from(input).unwrap_err());
    }

    #[test]
    fn test_from_malformed_token() {
        assert_eq!(
            AuthError::Invalid,
            Owner::from("Bearer not-a-token").unwrap_err()
        );
        assert_eq!(
            AuthError::Invalid,
            Owner::from("Bearer a.!!!!.c").unwrap_err()
        );
    }
}
