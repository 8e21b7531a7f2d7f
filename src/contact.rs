pub mod social;

use std::collections::HashMap;

use itertools::Itertools as _;
use serde::{Deserialize, Serialize};

use tapcard_util::sha256_fields;

/// One sharable identity, the data behind a card
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, uniffi::Record)]
#[serde(rename_all = "camelCase")]
pub struct Contact {
    pub name: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub company: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub website: Option<String>,

    /// Platform name to handle or URL
    #[serde(default)]
    pub social_links: HashMap<String, String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, thiserror::Error, uniffi::Error)]
#[uniffi::export(Display)]
pub enum ContactError {
    #[error("complete the Name field")]
    MissingName,
}

impl Contact {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), ..Default::default() }
    }

    /// A contact can only be shared with a name
    pub fn validate(&self) -> Result<(), ContactError> {
        match self.name() {
            Some(_) => Ok(()),
            None => Err(ContactError::MissingName),
        }
    }

    pub fn is_valid(&self) -> bool {
        self.validate().is_ok()
    }

    pub fn name(&self) -> Option<&str> {
        present(Some(&self.name))
    }

    pub fn title(&self) -> Option<&str> {
        present(self.title.as_ref())
    }

    pub fn company(&self) -> Option<&str> {
        present(self.company.as_ref())
    }

    pub fn phone(&self) -> Option<&str> {
        present(self.phone.as_ref())
    }

    pub fn email(&self) -> Option<&str> {
        present(self.email.as_ref())
    }

    pub fn website(&self) -> Option<&str> {
        present(self.website.as_ref())
    }

    /// Social links in platform order, so output never depends on map iteration order
    pub fn sorted_social_links(&self) -> Vec<(&str, &str)> {
        self.social_links
            .iter()
            .map(|(platform, handle)| (platform.as_str(), handle.as_str()))
            .sorted()
            .collect()
    }

    /// Stable hex digest over every field that ends up on a card
    pub fn fingerprint(&self) -> String {
        let fields = [
            self.name(),
            self.title(),
            self.company(),
            self.phone(),
            self.email(),
            self.website(),
        ];

        let social_links = self.sorted_social_links();
        let social_fields =
            social_links.iter().flat_map(|(platform, handle)| [platform.as_bytes(), handle.as_bytes()]);

        let fields = fields.into_iter().map(|field| field.unwrap_or_default().as_bytes());
        sha256_fields(fields.chain(social_fields))
    }
}

/// Empty and whitespace only fields count as absent
fn present(field: Option<&String>) -> Option<&str> {
    field.map(|field| field.trim()).filter(|field| !field.is_empty())
}

#[uniffi::export]
fn contact_fingerprint(contact: Contact) -> String {
    contact.fingerprint()
}

#[uniffi::export]
fn contact_is_valid(contact: Contact) -> bool {
    contact.is_valid()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_is_required() {
        assert_eq!(Contact::new("").validate(), Err(ContactError::MissingName));
        assert_eq!(Contact::new("   ").validate(), Err(ContactError::MissingName));
        assert_eq!(Contact::new("Ada").validate(), Ok(()));
    }

    #[test]
    fn test_blank_optional_fields_are_absent() {
        let contact = Contact {
            title: Some("  ".to_string()),
            phone: Some(" +15551234567 ".to_string()),
            ..Contact::new("Jane Doe")
        };

        assert_eq!(contact.title(), None);
        assert_eq!(contact.company(), None);
        assert_eq!(contact.phone(), Some("+15551234567"));
    }

    #[test]
    fn test_social_links_are_sorted() {
        let mut contact = Contact::new("Jane Doe");
        contact.social_links.insert("twitter".to_string(), "jane".to_string());
        contact.social_links.insert("github".to_string(), "janedoe".to_string());
        contact.social_links.insert("instagram".to_string(), "jd".to_string());

        let platforms =
            contact.sorted_social_links().into_iter().map(|(platform, _)| platform).collect_vec();
        assert_eq!(platforms, vec!["github", "instagram", "twitter"]);
    }

    #[test]
    fn test_fingerprint_is_stable_and_content_based() {
        let mut first = Contact::new("Jane Doe");
        first.social_links.insert("github".to_string(), "janedoe".to_string());
        first.social_links.insert("x".to_string(), "jane".to_string());

        let mut second = Contact::new("Jane Doe");
        second.social_links.insert("x".to_string(), "jane".to_string());
        second.social_links.insert("github".to_string(), "janedoe".to_string());

        assert_eq!(first.fingerprint(), second.fingerprint());

        // blank and absent are the same card
        let blank_title = Contact { title: Some(String::new()), ..first.clone() };
        assert_eq!(first.fingerprint(), blank_title.fingerprint());

        let changed = Contact { phone: Some("+15551234567".to_string()), ..first.clone() };
        assert_ne!(first.fingerprint(), changed.fingerprint());
    }

    #[test]
    fn test_fingerprint_distinguishes_fields() {
        let as_title = Contact { title: Some("CTO".to_string()), ..Contact::new("Jane") };
        let as_company = Contact { company: Some("CTO".to_string()), ..Contact::new("Jane") };

        assert_ne!(as_title.fingerprint(), as_company.fingerprint());
    }

    #[test]
    fn test_deserialize_from_camel_case_json() {
        let json = r#"{"name":"Jane Doe","email":"jane@x.com","socialLinks":{"github":"janedoe"}}"#;
        let contact: Contact = serde_json::from_str(json).unwrap();

        assert_eq!(contact.name(), Some("Jane Doe"));
        assert_eq!(contact.email(), Some("jane@x.com"));
        assert_eq!(contact.social_links.get("github").map(String::as_str), Some("janedoe"));
    }
}
