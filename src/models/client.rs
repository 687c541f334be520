#[derive(sqlx::FromRow, Debug, Clone, PartialEq, Eq)]
pub struct Client {
    pub client_id: i64,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
}

/// A row returned by a client lookup.
///
/// `phone_number` is only populated when the lookup was made by phone.
#[derive(sqlx::FromRow, Debug, Clone, PartialEq, Eq)]
pub struct ClientMatch {
    pub client_id: i64,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone_number: Option<String>,
}

/// Input for creating a client together with its initial phones.
#[derive(Debug, Clone, Default)]
pub struct NewClient {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phones: Vec<String>,
}

impl NewClient {
    pub fn with_email(email: impl Into<String>) -> Self {
        Self {
            email: Some(email.into()),
            ..Self::default()
        }
    }

    pub fn first_name(mut self, first_name: impl Into<String>) -> Self {
        self.first_name = Some(first_name.into());
        self
    }

    pub fn last_name(mut self, last_name: impl Into<String>) -> Self {
        self.last_name = Some(last_name.into());
        self
    }

    pub fn phone(mut self, phone_number: impl Into<String>) -> Self {
        self.phones.push(phone_number.into());
        self
    }
}

/// Partial update of a client.
///
/// A field set to `None` or to an empty string is left untouched. Phones are
/// appended to the client's existing numbers, never replacing them.
#[derive(Debug, Clone, Default)]
pub struct ClientChanges {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phones: Vec<String>,
}

impl ClientChanges {
    pub fn first_name(mut self, first_name: impl Into<String>) -> Self {
        self.first_name = Some(first_name.into());
        self
    }

    pub fn last_name(mut self, last_name: impl Into<String>) -> Self {
        self.last_name = Some(last_name.into());
        self
    }

    pub fn email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    pub fn phone(mut self, phone_number: impl Into<String>) -> Self {
        self.phones.push(phone_number.into());
        self
    }

    pub fn first_name_value(&self) -> Option<&str> {
        provided(&self.first_name)
    }

    pub fn last_name_value(&self) -> Option<&str> {
        provided(&self.last_name)
    }

    pub fn email_value(&self) -> Option<&str> {
        provided(&self.email)
    }

    /// True when at least one column of the client row would change.
    pub fn has_field_changes(&self) -> bool {
        self.first_name_value().is_some()
            || self.last_name_value().is_some()
            || self.email_value().is_some()
    }
}

/// Exact-match lookup criteria.
///
/// When `phone` is set every other criterion is ignored. Empty strings count
/// as absent.
#[derive(Debug, Clone, Default)]
pub struct ClientFilter {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
}

impl ClientFilter {
    pub fn first_name(mut self, first_name: impl Into<String>) -> Self {
        self.first_name = Some(first_name.into());
        self
    }

    pub fn last_name(mut self, last_name: impl Into<String>) -> Self {
        self.last_name = Some(last_name.into());
        self
    }

    pub fn email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    pub fn phone(mut self, phone_number: impl Into<String>) -> Self {
        self.phone = Some(phone_number.into());
        self
    }

    pub fn first_name_value(&self) -> Option<&str> {
        provided(&self.first_name)
    }

    pub fn last_name_value(&self) -> Option<&str> {
        provided(&self.last_name)
    }

    pub fn email_value(&self) -> Option<&str> {
        provided(&self.email)
    }

    pub fn phone_value(&self) -> Option<&str> {
        provided(&self.phone)
    }

    pub fn is_empty(&self) -> bool {
        self.phone_value().is_none()
            && self.first_name_value().is_none()
            && self.last_name_value().is_none()
            && self.email_value().is_none()
    }
}

fn provided(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_strings_are_not_changes() {
        let changes = ClientChanges::default().first_name("").email("");
        assert!(!changes.has_field_changes());

        let changes = changes.last_name("Petrov");
        assert!(changes.has_field_changes());
        assert_eq!(changes.last_name_value(), Some("Petrov"));
        assert_eq!(changes.first_name_value(), None);
    }

    #[test]
    fn filter_with_only_empty_values_is_empty() {
        assert!(ClientFilter::default().is_empty());
        assert!(ClientFilter::default().phone("").first_name("").is_empty());
        assert!(!ClientFilter::default().email("a@b.com").is_empty());
    }
}
