use std::fmt;

use serde::Deserialize;

use crate::users::error::SignupError;

/// Request body for `POST /signup`, form-encoded or JSON.
///
/// Every field is optional at the wire level so a missing field surfaces as
/// a validation failure rather than a body rejection.
#[derive(Default, Deserialize)]
pub struct SignupRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default)]
    pub food_pref: Option<String>,
    #[serde(default)]
    pub hobby: Option<String>,
}

impl fmt::Debug for SignupRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SignupRequest")
            .field("name", &self.name)
            .field("email", &self.email)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("food_pref", &self.food_pref)
            .field("hobby", &self.hobby)
            .finish()
    }
}

/// A signup whose five fields are all present and non-empty.
pub struct ValidSignup {
    pub name: String,
    pub email: String,
    pub password: String,
    pub food_pref: String,
    pub hobby: String,
}

impl SignupRequest {
    pub fn validate(self) -> Result<ValidSignup, SignupError> {
        fn present(field: Option<String>) -> Result<String, SignupError> {
            field.filter(|v| !v.is_empty()).ok_or(SignupError::Validation)
        }

        Ok(ValidSignup {
            name: present(self.name)?,
            email: present(self.email)?,
            password: present(self.password)?,
            food_pref: present(self.food_pref)?,
            hobby: present(self.hobby)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full() -> SignupRequest {
        SignupRequest {
            name: Some("Ana".into()),
            email: Some("a@x.com".into()),
            password: Some("secret1".into()),
            food_pref: Some("sushi".into()),
            hobby: Some("chess".into()),
        }
    }

    #[test]
    fn complete_request_validates() {
        let valid = full().validate().expect("all fields present");
        assert_eq!(valid.email, "a@x.com");
        assert_eq!(valid.password, "secret1");
    }

    #[test]
    fn each_missing_or_empty_field_is_rejected() {
        let blankers: [fn(&mut SignupRequest); 5] = [
            |r| r.name = None,
            |r| r.email = Some(String::new()),
            |r| r.password = None,
            |r| r.food_pref = Some(String::new()),
            |r| r.hobby = None,
        ];
        for blank in blankers {
            let mut req = full();
            blank(&mut req);
            assert!(matches!(req.validate(), Err(SignupError::Validation)));
        }
    }

    #[test]
    fn values_are_not_trimmed() {
        let mut req = full();
        req.email = Some(" a@x.com ".into());
        assert_eq!(req.validate().unwrap().email, " a@x.com ");
    }

    #[test]
    fn debug_redacts_password() {
        let rendered = format!("{:?}", full());
        assert!(!rendered.contains("secret1"));
        assert!(rendered.contains("<redacted>"));
    }

    #[test]
    fn json_with_missing_fields_deserializes() {
        let req: SignupRequest = serde_json::from_str(r#"{"name":"Ana"}"#).unwrap();
        assert_eq!(req.name.as_deref(), Some("Ana"));
        assert!(req.email.is_none());
    }
}
