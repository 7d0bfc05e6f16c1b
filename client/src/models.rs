// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: MIT-0

use std::fmt;

use mongodb::bson::{Bson, Document, doc};
use mongodb::options::{AuthMechanism, Credential};
use serde::de::Error as _;
use serde::{Deserialize, Deserializer};
use zeroize::ZeroizeOnDrop;

use crate::configuration::AppOptions;
use crate::constants::{AWS_AUTH_SOURCE, AWS_SESSION_TOKEN_PROPERTY};

/// IAM key material presented to DocumentDB through MONGODB-AWS.
#[derive(ZeroizeOnDrop)]
pub struct IamCredential {
    pub access_key_id: String,
    pub secret_access_key: String,
    pub session_token: Option<String>,
}

impl IamCredential {
    pub fn new(
        access_key_id: impl Into<String>,
        secret_access_key: impl Into<String>,
        session_token: Option<String>,
    ) -> Self {
        Self {
            access_key_id: access_key_id.into(),
            secret_access_key: secret_access_key.into(),
            // an empty token means "no token"
            session_token: session_token.filter(|token| !token.is_empty()),
        }
    }

    /// Mechanism properties for the driver, `None` when there is no session token.
    pub fn mechanism_properties(&self) -> Option<Document> {
        self.session_token
            .as_ref()
            .map(|token| doc! { AWS_SESSION_TOKEN_PROPERTY: token.as_str() })
    }

    pub fn to_mongo_credential(&self) -> Credential {
        Credential::builder()
            .mechanism(AuthMechanism::MongoDbAws)
            .source(AWS_AUTH_SOURCE.to_string())
            .username(self.access_key_id.clone())
            .password(self.secret_access_key.clone())
            .mechanism_properties(self.mechanism_properties())
            .build()
    }
}

impl IamCredential {
    /// Moves the key material out of the options, leaving them empty.
    pub fn take_from(options: &mut AppOptions) -> Self {
        Self::new(
            std::mem::take(&mut options.access_key_id),
            std::mem::take(&mut options.secret_access_key),
            options.session_token.take(),
        )
    }
}

// Custom Debug implementation to prevent accidental logging of sensitive data
impl fmt::Debug for IamCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IamCredential")
            .field("access_key_id", &"[REDACTED]")
            .field("secret_access_key", &"[REDACTED]")
            .field(
                "session_token",
                &self.session_token.as_ref().map(|_| "[REDACTED]"),
            )
            .finish()
    }
}

/// The record read back from the users collection.
///
/// Missing and null fields take their zero values.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct User {
    #[serde(default, deserialize_with = "nullable_string")]
    pub name: String,
    #[serde(default, deserialize_with = "whole_number")]
    pub age: i64,
}

fn nullable_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// Accepts int32, int64, null, and doubles without a fractional part.
fn whole_number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
    match Option::<Bson>::deserialize(deserializer)? {
        None | Some(Bson::Null) => Ok(0),
        Some(Bson::Int32(value)) => Ok(i64::from(value)),
        Some(Bson::Int64(value)) => Ok(value),
        Some(Bson::Double(value))
            if value.fract() == 0.0 && value >= i64::MIN as f64 && value < i64::MAX as f64 =>
        {
            Ok(value as i64)
        }
        Some(other) => Err(D::Error::custom(format!(
            "expected a whole number, found {other}"
        ))),
    }
}

impl fmt::Display for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{{} {}}}", self.name, self.age)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mongodb::bson::from_document;

    #[test]
    fn test_credential_without_session_token_has_no_properties() {
        let credential = IamCredential::new("AKIDEXAMPLE", "secret", None);
        let mongo = credential.to_mongo_credential();
        assert_eq!(mongo.mechanism_properties, None);
        assert_eq!(mongo.mechanism, Some(AuthMechanism::MongoDbAws));
        assert_eq!(mongo.source.as_deref(), Some("$external"));
        assert_eq!(mongo.username.as_deref(), Some("AKIDEXAMPLE"));
        assert_eq!(mongo.password.as_deref(), Some("secret"));
    }

    #[test]
    fn test_empty_session_token_is_treated_as_missing() {
        let credential = IamCredential::new("AKIDEXAMPLE", "secret", Some(String::new()));
        assert_eq!(credential.session_token, None);
        assert_eq!(credential.to_mongo_credential().mechanism_properties, None);
    }

    #[test]
    fn test_session_token_becomes_mechanism_property() {
        let credential = IamCredential::new("AKIDEXAMPLE", "secret", Some("tok123".into()));
        let mongo = credential.to_mongo_credential();
        assert_eq!(
            mongo.mechanism_properties,
            Some(doc! { "AWS_SESSION_TOKEN": "tok123" })
        );
    }

    #[test]
    fn test_credential_takes_secrets_from_options() {
        let mut options = AppOptions {
            access_key_id: "AKIDEXAMPLE".to_string(),
            secret_access_key: "secret".to_string(),
            session_token: Some("tok123".to_string()),
            ..AppOptions::default()
        };
        let credential = IamCredential::take_from(&mut options);
        assert_eq!(credential.access_key_id, "AKIDEXAMPLE");
        assert_eq!(credential.secret_access_key, "secret");
        assert_eq!(credential.session_token.as_deref(), Some("tok123"));
        assert!(options.access_key_id.is_empty());
        assert!(options.secret_access_key.is_empty());
        assert_eq!(options.session_token, None);
    }

    #[test]
    fn test_credential_debug_is_redacted() {
        let credential =
            IamCredential::new("AKIDEXAMPLE", "wJalrXUtnFEMI", Some("tok123".into()));
        let rendered = format!("{credential:?}");
        assert!(!rendered.contains("AKIDEXAMPLE"));
        assert!(!rendered.contains("wJalrXUtnFEMI"));
        assert!(!rendered.contains("tok123"));
    }

    #[test]
    fn test_user_decodes_and_displays() {
        let user: User = from_document(doc! { "_id": 1, "name": "steve", "age": 555 }).unwrap();
        assert_eq!(
            user,
            User {
                name: "steve".to_string(),
                age: 555
            }
        );
        assert_eq!(user.to_string(), "{steve 555}");
    }

    #[test]
    fn test_user_missing_fields_take_zero_values() {
        let user: User = from_document(doc! { "name": "steve" }).unwrap();
        assert_eq!(user.age, 0);
        let user: User = from_document(doc! {}).unwrap();
        assert_eq!(user, User::default());
    }

    #[test]
    fn test_user_age_stored_as_double() {
        let user: User = from_document(doc! { "name": "steve", "age": 555.0 }).unwrap();
        assert_eq!(user.age, 555);
        assert_eq!(user.to_string(), "{steve 555}");
    }

    #[test]
    fn test_user_age_stored_as_int64() {
        let user: User = from_document(doc! { "name": "steve", "age": 555_i64 }).unwrap();
        assert_eq!(user.age, 555);
    }

    #[test]
    fn test_user_null_fields_take_zero_values() {
        let user: User = from_document(doc! { "name": Bson::Null, "age": Bson::Null }).unwrap();
        assert_eq!(user, User::default());
    }

    #[test]
    fn test_user_fractional_age_is_an_error() {
        let result = from_document::<User>(doc! { "name": "steve", "age": 555.5 });
        assert!(result.is_err());
    }

    #[test]
    fn test_user_wrong_type_is_an_error() {
        let result = from_document::<User>(doc! { "name": "steve", "age": "old" });
        assert!(result.is_err());
        let result = from_document::<User>(doc! { "name": 42, "age": 555 });
        assert!(result.is_err());
    }
}
