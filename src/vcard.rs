//! vCard 3.0 serialization of a [`Contact`]
//!
//! Field order is fixed so the same contact always produces the same bytes:
//! `BEGIN`, `VERSION`, `FN`, `N`, `TITLE`, `ORG`, `TEL`, `EMAIL`, `URL` (website first, then
//! social links in platform order), `END`

use crate::contact::{Contact, ContactError, social::resolve_social_url};

const LINE_ENDING: &str = "\r\n";

/// Serialize the contact into the bytes of a `text/x-vcard` record
pub fn serialize(contact: &Contact) -> Result<Vec<u8>, ContactError> {
    to_string(contact).map(String::into_bytes)
}

pub fn to_string(contact: &Contact) -> Result<String, ContactError> {
    let name = contact.name().ok_or(ContactError::MissingName)?;
    let (family_name, given_name) = structured_name(name);

    let mut card = VCardBuilder::default();
    card.raw("BEGIN", "VCARD");
    card.raw("VERSION", "3.0");
    card.text("FN", name);
    card.raw("N", &format!("{};{};;;", escape(family_name), escape(given_name)));

    if let Some(title) = contact.title() {
        card.text("TITLE", title);
    }

    if let Some(company) = contact.company() {
        card.text("ORG", company);
    }

    if let Some(phone) = contact.phone() {
        card.text("TEL;TYPE=CELL", phone);
    }

    if let Some(email) = contact.email() {
        card.text("EMAIL;TYPE=WORK", email);
    }

    if let Some(website) = contact.website() {
        card.raw("URL", website);
    }

    let social_urls = contact
        .sorted_social_links()
        .into_iter()
        .filter_map(|(platform, handle)| resolve_social_url(platform, handle));

    for url in social_urls {
        card.raw("URL", &url);
    }

    card.raw("END", "VCARD");
    Ok(card.finish())
}

/// Split a display name into `(family, given)` for the `N` property
///
/// Two or more words: the last word is the family name and the first word the given name, any
/// middle words are not encoded. A single word is the family name with an empty given name.
pub fn structured_name(name: &str) -> (&str, &str) {
    let mut words = name.split_whitespace();

    match (words.next(), words.next_back()) {
        (Some(first), Some(last)) => (last, first),
        (Some(only), None) => (only, ""),
        _ => ("", ""),
    }
}

/// Escape a text value, backslash, comma, semicolon and newlines
pub fn escape(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());

    for c in value.chars() {
        match c {
            '\\' => escaped.push_str("\\\\"),
            ',' => escaped.push_str("\\,"),
            ';' => escaped.push_str("\\;"),
            '\n' => escaped.push_str("\\n"),
            '\r' => {}
            c => escaped.push(c),
        }
    }

    escaped
}

#[derive(Debug, Default)]
struct VCardBuilder {
    card: String,
}

impl VCardBuilder {
    fn text(&mut self, property: &str, value: &str) {
        let value = escape(value);
        self.raw(property, &value);
    }

    // line breaks can't be escaped in a URI value, they are dropped instead
    fn raw(&mut self, property: &str, value: &str) {
        self.card.push_str(property);
        self.card.push(':');
        self.card.extend(value.chars().filter(|c| !matches!(*c, '\r' | '\n')));
        self.card.push_str(LINE_ENDING);
    }

    fn finish(self) -> String {
        self.card
    }
}

#[uniffi::export]
fn contact_to_vcard(contact: Contact) -> Result<String, ContactError> {
    to_string(&contact)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn lines(contact: &Contact) -> Vec<String> {
        to_string(contact).unwrap().split(LINE_ENDING).map(ToString::to_string).collect()
    }

    fn jane() -> Contact {
        Contact {
            phone: Some("+15551234567".to_string()),
            email: Some("jane@x.com".to_string()),
            ..Contact::new("Jane Doe")
        }
    }

    #[test]
    fn test_minimal_card() {
        let vcard = to_string(&jane()).unwrap();

        assert_eq!(
            vcard,
            "BEGIN:VCARD\r\n\
             VERSION:3.0\r\n\
             FN:Jane Doe\r\n\
             N:Doe;Jane;;;\r\n\
             TEL;TYPE=CELL:+15551234567\r\n\
             EMAIL;TYPE=WORK:jane@x.com\r\n\
             END:VCARD\r\n"
        );
    }

    #[test]
    fn test_single_word_name_is_family_name() {
        let lines = lines(&Contact::new("Madonna"));
        assert!(lines.contains(&"N:Madonna;;;;".to_string()));
        assert!(lines.contains(&"FN:Madonna".to_string()));
    }

    #[test]
    fn test_two_word_name_splits_family_and_given() {
        let lines = lines(&Contact::new("Ada Lovelace"));
        assert!(lines.contains(&"N:Lovelace;Ada;;;".to_string()));
    }

    #[test]
    fn test_middle_names_are_not_in_structured_name() {
        assert_eq!(structured_name("Augusta Ada King"), ("King", "Augusta"));
        assert_eq!(structured_name("  Ada   Lovelace "), ("Lovelace", "Ada"));
        assert_eq!(structured_name("Madonna"), ("Madonna", ""));
    }

    #[test]
    fn test_full_field_order() {
        let mut contact = Contact {
            title: Some("Engineer".to_string()),
            company: Some("Analytical Engines".to_string()),
            website: Some("https://ada.dev".to_string()),
            ..jane()
        };
        contact.social_links.insert("twitter".to_string(), "@jane".to_string());
        contact.social_links.insert("github".to_string(), "janedoe".to_string());

        let properties = lines(&contact)
            .into_iter()
            .filter(|line| !line.is_empty())
            .map(|line| line.split(':').next().unwrap_or_default().to_string())
            .collect::<Vec<_>>();

        assert_eq!(
            properties,
            vec![
                "BEGIN",
                "VERSION",
                "FN",
                "N",
                "TITLE",
                "ORG",
                "TEL;TYPE=CELL",
                "EMAIL;TYPE=WORK",
                "URL",
                "URL",
                "URL",
                "END"
            ]
        );

        let urls = lines(&contact).into_iter().filter(|line| line.starts_with("URL:")).collect::<Vec<_>>();
        assert_eq!(
            urls,
            vec!["URL:https://ada.dev", "URL:https://github.com/janedoe", "URL:https://x.com/jane"]
        );
    }

    #[test]
    fn test_unknown_social_platform_is_omitted() {
        let mut contact = jane();
        contact.social_links.insert("mastodon".to_string(), "jane".to_string());
        assert_eq!(to_string(&contact).unwrap(), to_string(&jane()).unwrap());

        contact.social_links.insert("github".to_string(), "janedoe".to_string());
        assert!(lines(&contact).contains(&"URL:https://github.com/janedoe".to_string()));
    }

    #[test]
    fn test_text_values_are_escaped() {
        let contact = Contact {
            company: Some("Doe, Smith; Partners".to_string()),
            title: Some("Line one\nLine two".to_string()),
            ..Contact::new("Jane O\\Doe")
        };

        let lines = lines(&contact);
        assert!(lines.contains(&"ORG:Doe\\, Smith\\; Partners".to_string()));
        assert!(lines.contains(&"TITLE:Line one\\nLine two".to_string()));
        assert!(lines.contains(&"N:O\\\\Doe;Jane;;;".to_string()));
    }

    #[test]
    fn test_urls_are_not_escaped() {
        let contact = Contact {
            website: Some("https://example.com/a,b;c".to_string()),
            ..Contact::new("Jane")
        };
        assert!(lines(&contact).contains(&"URL:https://example.com/a,b;c".to_string()));
    }

    #[test]
    fn test_missing_name_is_an_error() {
        assert_eq!(serialize(&Contact::new(" ")), Err(ContactError::MissingName));
    }

    #[test]
    fn test_serialize_is_deterministic() {
        let mut contact = jane();
        for platform in ["github", "twitter", "linkedin", "instagram", "facebook"] {
            contact.social_links.insert(platform.to_string(), "janedoe".to_string());
        }

        let first = serialize(&contact).unwrap();
        let second = serialize(&contact.clone()).unwrap();
        assert_eq!(first, second);
    }
}
