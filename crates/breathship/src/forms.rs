//! Client for the external forms-intake endpoint.
//!
//! Contact, newsletter, booking and corporate forms all post JSON to the
//! same endpoint. The payload carries a `type` discriminator plus the
//! site's `source` label and a submission timestamp.

use chrono::{DateTime, SecondsFormat, Utc};
use reqwest::Client;
use serde::Serialize;
use serde_json::Value;
use tracing::{error, info};

use crate::config::Config;
use crate::error::{Error, Result};

/// General contact form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactForm {
    /// Sender name.
    pub name: String,
    /// Reply address.
    pub email: String,
    /// Phone number.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    /// Message body.
    pub message: String,
    /// Session the sender asks about.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_type: Option<String>,
    /// Preferred date.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preferred_date: Option<String>,
}

/// Newsletter sign-up.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct NewsletterForm {
    /// Subscriber address.
    pub email: String,
}

/// Session booking request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingForm {
    /// Visitor name.
    pub name: String,
    /// Reply address.
    pub email: String,
    /// Phone number.
    pub phone: String,
    /// Session being booked.
    pub session_type: String,
    /// Preferred date.
    pub preferred_date: String,
    /// Preferred start time.
    pub preferred_time: String,
    /// Optional note.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Corporate programme inquiry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CorporateForm {
    /// Company.
    pub company_name: String,
    /// Person to reply to.
    pub contact_name: String,
    /// Reply address.
    pub email: String,
    /// Phone number.
    pub phone: String,
    /// Head count band.
    pub company_size: String,
    /// Programme asked about.
    pub program_type: String,
    /// Message body.
    pub message: String,
}

/// One form post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type")]
pub enum FormSubmission {
    /// `type: contact`
    #[serde(rename = "contact")]
    Contact(ContactForm),
    /// `type: newsletter_subscription`
    #[serde(rename = "newsletter_subscription")]
    Newsletter(NewsletterForm),
    /// `type: session_booking`
    #[serde(rename = "session_booking")]
    Booking(BookingForm),
    /// `type: corporate_inquiry`
    #[serde(rename = "corporate_inquiry")]
    Corporate(CorporateForm),
}

fn require(field: &str, value: &str) -> std::result::Result<(), String> {
    if value.trim().is_empty() {
        Err(format!("{field} is required"))
    } else {
        Ok(())
    }
}

fn require_email(value: &str) -> std::result::Result<(), String> {
    require("email", value)?;
    if value.contains('@') {
        Ok(())
    } else {
        Err(format!("'{value}' is not an email address"))
    }
}

impl FormSubmission {
    /// The `type` discriminator sent with the form.
    #[must_use]
    pub fn form_type(&self) -> &'static str {
        match self {
            Self::Contact(_) => "contact",
            Self::Newsletter(_) => "newsletter_subscription",
            Self::Booking(_) => "session_booking",
            Self::Corporate(_) => "corporate_inquiry",
        }
    }

    /// Check the fields every form of this type must carry.
    ///
    /// # Errors
    ///
    /// Returns a description of the first missing or malformed field.
    pub fn validate(&self) -> std::result::Result<(), String> {
        match self {
            Self::Contact(form) => {
                require("name", &form.name)?;
                require_email(&form.email)
            }
            Self::Newsletter(form) => require_email(&form.email),
            Self::Booking(form) => {
                require("name", &form.name)?;
                require_email(&form.email)
            }
            Self::Corporate(form) => {
                require("companyName", &form.company_name)?;
                require("contactName", &form.contact_name)?;
                require_email(&form.email)
            }
        }
    }

    fn success_message(&self) -> &'static str {
        match self {
            Self::Contact(_) => "Form submitted successfully!",
            Self::Newsletter(_) => "Successfully subscribed to newsletter!",
            Self::Booking(_) => "Session booking request submitted successfully!",
            Self::Corporate(_) => "Corporate inquiry submitted successfully!",
        }
    }

    fn failure_message(&self) -> &'static str {
        match self {
            Self::Contact(_) => "Failed to submit form. Please try again.",
            Self::Newsletter(_) => "Failed to subscribe. Please try again.",
            Self::Booking(_) => "Failed to book session. Please try again.",
            Self::Corporate(_) => "Failed to submit inquiry. Please try again.",
        }
    }
}

/// What the visitor is told after submitting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormOutcome {
    /// Whether the endpoint accepted the post.
    pub success: bool,
    /// Message for the visitor.
    pub message: String,
}

/// Posts forms to the intake endpoint.
#[derive(Debug, Clone)]
pub struct FormsClient {
    client: Client,
    endpoint: String,
    source: String,
}

impl FormsClient {
    /// Create a client posting to `endpoint`, labelling posts with `source`.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(endpoint: impl Into<String>, source: impl Into<String>) -> Result<Self> {
        Ok(Self {
            client: Client::builder().build()?,
            endpoint: endpoint.into(),
            source: source.into(),
        })
    }

    /// Create a client from the `[forms]` configuration section.
    ///
    /// # Errors
    ///
    /// Returns an error if no endpoint is configured or the HTTP client
    /// cannot be built.
    pub fn from_config(config: &Config) -> Result<Self> {
        if config.forms.endpoint.is_empty() {
            return Err(Error::config("forms.endpoint is not configured"));
        }
        Self::new(config.forms.endpoint.clone(), config.forms.source.clone())
    }

    /// The JSON body posted for `submission` at time `now`.
    ///
    /// # Errors
    ///
    /// Returns an error if the submission does not serialize to an object.
    pub fn payload(&self, submission: &FormSubmission, now: DateTime<Utc>) -> Result<Value> {
        let mut value = serde_json::to_value(submission)?;
        let Value::Object(body) = &mut value else {
            return Err(Error::internal("form submission is not a JSON object"));
        };
        body.insert("source".to_string(), Value::String(self.source.clone()));
        body.insert(
            "timestamp".to_string(),
            Value::String(now.to_rfc3339_opts(SecondsFormat::Millis, true)),
        );
        Ok(value)
    }

    /// Validate and post a form. Never fails; the outcome says what happened.
    pub async fn submit(&self, submission: &FormSubmission) -> FormOutcome {
        if let Err(reason) = submission.validate() {
            info!("Rejected {} form: {reason}", submission.form_type());
            return FormOutcome {
                success: false,
                message: format!("{} ({reason})", submission.failure_message()),
            };
        }

        match self.post(submission).await {
            Ok(()) => {
                info!("Submitted {} form", submission.form_type());
                FormOutcome {
                    success: true,
                    message: submission.success_message().to_string(),
                }
            }
            Err(e) => {
                error!("Failed to submit {} form: {e}", submission.form_type());
                FormOutcome {
                    success: false,
                    message: submission.failure_message().to_string(),
                }
            }
        }
    }

    async fn post(&self, submission: &FormSubmission) -> Result<()> {
        let body = self.payload(submission, Utc::now())?;
        let response = self.client.post(&self.endpoint).json(&body).send().await?;
        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(Error::HttpStatus {
                url: self.endpoint.clone(),
                status: status.as_u16(),
                body: response.text().await.unwrap_or_default(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn client() -> FormsClient {
        FormsClient::new("http://127.0.0.1:9/form", "Breathship Website").unwrap()
    }

    #[test]
    fn test_booking_payload() {
        let submission = FormSubmission::Booking(BookingForm {
            name: "Sam".to_string(),
            email: "sam@example.com".to_string(),
            phone: "555-0100".to_string(),
            session_type: "Group".to_string(),
            preferred_date: "2024-02-15".to_string(),
            preferred_time: "10:00 AM".to_string(),
            message: None,
        });
        let now = Utc.with_ymd_and_hms(2024, 2, 1, 9, 30, 0).unwrap();
        let body = client().payload(&submission, now).unwrap();

        assert_eq!(body["type"], "session_booking");
        assert_eq!(body["sessionType"], "Group");
        assert_eq!(body["preferredTime"], "10:00 AM");
        assert_eq!(body["source"], "Breathship Website");
        assert_eq!(body["timestamp"], "2024-02-01T09:30:00.000Z");
        assert!(body.get("message").is_none());
    }

    #[test]
    fn test_form_types() {
        let newsletter = FormSubmission::Newsletter(NewsletterForm {
            email: "a@b.c".to_string(),
        });
        assert_eq!(newsletter.form_type(), "newsletter_subscription");
        let body = client().payload(&newsletter, Utc::now()).unwrap();
        assert_eq!(body["type"], "newsletter_subscription");
        assert_eq!(body["email"], "a@b.c");

        let corporate = FormSubmission::Corporate(CorporateForm::default());
        assert_eq!(corporate.form_type(), "corporate_inquiry");
        let body = client().payload(&corporate, Utc::now()).unwrap();
        assert!(body.get("companyName").is_some());
    }

    #[test]
    fn test_validation() {
        let missing_name = FormSubmission::Contact(ContactForm {
            email: "a@b.c".to_string(),
            ..ContactForm::default()
        });
        assert_eq!(missing_name.validate().unwrap_err(), "name is required");

        let bad_email = FormSubmission::Newsletter(NewsletterForm {
            email: "nobody".to_string(),
        });
        assert!(bad_email.validate().unwrap_err().contains("not an email"));
    }

    #[tokio::test]
    async fn test_invalid_form_fails_without_request() {
        let outcome = client()
            .submit(&FormSubmission::Newsletter(NewsletterForm::default()))
            .await;
        assert!(!outcome.success);
        assert!(outcome.message.starts_with("Failed to subscribe"));
    }

    #[tokio::test]
    async fn test_unreachable_endpoint() {
        let outcome = client()
            .submit(&FormSubmission::Newsletter(NewsletterForm {
                email: "a@b.c".to_string(),
            }))
            .await;
        assert_eq!(outcome.message, "Failed to subscribe. Please try again.");
    }

    #[test]
    fn test_from_config_requires_endpoint() {
        let config = Config::default();
        assert!(FormsClient::from_config(&config).is_err());
    }
}
