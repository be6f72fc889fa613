//! vCard 3.0 writer (RFC 2425 / RFC 2426)

use chrono::{DateTime, NaiveDate, Utc};
use helpkit_domain::Organization;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::files::slugify;

/// vCard rendering errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VcardError {
    #[error("vCard needs a formatted name or a structured name")]
    MissingName,
}

/// Folding limit in octets, CRLF excluded
const LINE_LIMIT: usize = 75;

/// A value with its `TYPE` parameters (`WORK`, `CELL`, ...)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Typed {
    pub value: String,
    pub types: Vec<String>,
}

impl Typed {
    fn new(value: impl Into<String>, types: &[&str]) -> Self {
        Self {
            value: value.into(),
            types: types.iter().map(|t| t.to_ascii_uppercase()).collect(),
        }
    }
}

/// Postal address (`ADR`)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    pub types: Vec<String>,
    pub po_box: String,
    pub extended: String,
    pub street: String,
    pub locality: String,
    pub region: String,
    pub postal_code: String,
    pub country: String,
}

impl Address {
    /// Street address with postal code and city
    pub fn new(street: impl Into<String>, postal_code: impl Into<String>, locality: impl Into<String>) -> Self {
        Self {
            street: street.into(),
            postal_code: postal_code.into(),
            locality: locality.into(),
            ..Self::default()
        }
    }

    pub fn with_country(mut self, country: impl Into<String>) -> Self {
        self.country = country.into();
        self
    }

    /// `TYPE` parameters, e.g. `&["work"]`; stored uppercase
    pub fn with_types(mut self, types: &[&str]) -> Self {
        self.types = types.iter().map(|t| t.to_ascii_uppercase()).collect();
        self
    }

    fn is_empty(&self) -> bool {
        [&self.po_box, &self.extended, &self.street, &self.locality, &self.region, &self.postal_code, &self.country]
            .iter()
            .all(|part| part.trim().is_empty())
    }
}

/// Contact card builder
///
/// ```
/// use helpkit_common::contact::VCard;
///
/// let card = VCard::new()
///     .name("Martin", "Claire")
///     .email("claire@example.fr", &["work"])
///     .render()
///     .unwrap();
///
/// assert!(card.starts_with("BEGIN:VCARD\r\nVERSION:3.0\r\n"));
/// assert!(card.contains("FN:Claire Martin\r\n"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VCard {
    pub family_name: String,
    pub given_name: String,
    pub additional_names: String,
    pub prefix: String,
    pub suffix: String,
    pub formatted_name: Option<String>,
    pub organization: Option<String>,
    pub title: Option<String>,
    pub role: Option<String>,
    pub emails: Vec<Typed>,
    pub phones: Vec<Typed>,
    pub addresses: Vec<Address>,
    pub url: Option<String>,
    pub note: Option<String>,
    pub birthday: Option<NaiveDate>,
    pub photo_url: Option<String>,
    pub categories: Vec<String>,
    pub revision: Option<DateTime<Utc>>,
}

impl VCard {
    /// Empty card; set at least a name before rendering
    pub fn new() -> Self {
        Self::default()
    }

    /// Card for a company: name as `FN` and `ORG`, registry address as `ADR;TYPE=WORK`
    pub fn from_organization(organization: &Organization) -> Self {
        let mut card = Self::new().formatted_name(&organization.name).organization(&organization.name);

        let address = Address {
            types: vec!["WORK".to_string()],
            street: organization.address_lines.join("\n"),
            postal_code: organization.postal_code.clone().unwrap_or_default(),
            locality: organization.city.clone().unwrap_or_default(),
            country: organization.country_code.clone().unwrap_or_default(),
            ..Address::default()
        };
        if !address.is_empty() {
            card = card.address(address);
        }

        if let Some(siret) = organization.siret() {
            card = card.note(format!("SIRET {siret}"));
        } else if let Some(siren) = organization.siren() {
            card = card.note(format!("SIREN {siren}"));
        }
        card
    }

    /// Structured name (`N`) family and given parts
    pub fn name(mut self, family: impl Into<String>, given: impl Into<String>) -> Self {
        self.family_name = family.into();
        self.given_name = given.into();
        self
    }

    pub fn additional_names(mut self, names: impl Into<String>) -> Self {
        self.additional_names = names.into();
        self
    }

    /// Honorific prefix (`M.`, `Dr`)
    pub fn prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    pub fn suffix(mut self, suffix: impl Into<String>) -> Self {
        self.suffix = suffix.into();
        self
    }

    /// Explicit `FN`, overriding the composed name
    pub fn formatted_name(mut self, name: impl Into<String>) -> Self {
        self.formatted_name = Some(name.into());
        self
    }

    pub fn organization(mut self, organization: impl Into<String>) -> Self {
        self.organization = Some(organization.into());
        self
    }

    /// Job title
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn role(mut self, role: impl Into<String>) -> Self {
        self.role = Some(role.into());
        self
    }

    /// Add an email; `INTERNET` is always the first type
    pub fn email(mut self, address: impl Into<String>, types: &[&str]) -> Self {
        self.emails.push(Typed::new(address, types));
        self
    }

    /// Add a phone number with types such as `cell` or `work`
    pub fn phone(mut self, number: impl Into<String>, types: &[&str]) -> Self {
        self.phones.push(Typed::new(number, types));
        self
    }

    pub fn address(mut self, address: Address) -> Self {
        self.addresses.push(address);
        self
    }

    /// Website; control characters are dropped when rendering
    pub fn url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    pub fn note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }

    pub fn birthday(mut self, birthday: NaiveDate) -> Self {
        self.birthday = Some(birthday);
        self
    }

    /// Photo referenced by URI (`PHOTO;VALUE=URI`)
    pub fn photo_url(mut self, url: impl Into<String>) -> Self {
        self.photo_url = Some(url.into());
        self
    }

    /// Append one `CATEGORIES` entry
    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.categories.push(category.into());
        self
    }

    /// Last modification time (`REV`), written in UTC
    pub fn revision(mut self, revision: DateTime<Utc>) -> Self {
        self.revision = Some(revision);
        self
    }

    /// `FN` value: explicit formatted name, else "prefix given additional family suffix"
    pub fn display_name(&self) -> Option<String> {
        if let Some(name) = self.formatted_name.as_deref().map(str::trim).filter(|n| !n.is_empty()) {
            return Some(name.to_string());
        }

        let composed = [&self.prefix, &self.given_name, &self.additional_names, &self.family_name, &self.suffix]
            .iter()
            .map(|part| part.trim())
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(" ");
        (!composed.is_empty()).then_some(composed)
    }

    /// `<slug>.vcf`, or `contact.vcf` when the name has no usable characters
    pub fn file_name(&self) -> String {
        let slug = self.display_name().map(|name| slugify(&name)).unwrap_or_default();
        if slug.is_empty() {
            "contact.vcf".to_string()
        } else {
            format!("{slug}.vcf")
        }
    }

    /// Serialize with CRLF line endings and 75-octet folding
    ///
    /// # Errors
    ///
    /// [`VcardError::MissingName`] when neither a formatted nor a structured
    /// name is set.
    pub fn render(&self) -> Result<String, VcardError> {
        let display_name = self.display_name().ok_or(VcardError::MissingName)?;

        let mut lines = vec!["BEGIN:VCARD".to_string(), "VERSION:3.0".to_string()];

        let structured = [&self.family_name, &self.given_name, &self.additional_names, &self.prefix, &self.suffix]
            .iter()
            .map(|part| escape(part))
            .collect::<Vec<_>>()
            .join(";");
        lines.push(format!("N:{structured}"));
        lines.push(format!("FN:{}", escape(&display_name)));

        if let Some(org) = &self.organization {
            lines.push(format!("ORG:{}", escape(org)));
        }
        if let Some(title) = &self.title {
            lines.push(format!("TITLE:{}", escape(title)));
        }
        if let Some(role) = &self.role {
            lines.push(format!("ROLE:{}", escape(role)));
        }

        for email in &self.emails {
            let mut types = vec!["INTERNET".to_string()];
            types.extend(
                email.types.iter().map(|t| param_value(t)).filter(|t| !t.is_empty() && t != "INTERNET"),
            );
            lines.push(format!("EMAIL;TYPE={}:{}", types.join(","), escape(&email.value)));
        }
        for phone in &self.phones {
            lines.push(format!("TEL{}:{}", type_param(&phone.types), escape(&phone.value)));
        }
        for address in &self.addresses {
            let parts = [
                &address.po_box,
                &address.extended,
                &address.street,
                &address.locality,
                &address.region,
                &address.postal_code,
                &address.country,
            ]
            .iter()
            .map(|part| escape(part))
            .collect::<Vec<_>>()
            .join(";");
            lines.push(format!("ADR{}:{parts}", type_param(&address.types)));
        }

        if let Some(url) = &self.url {
            lines.push(format!("URL:{}", uri_value(url)));
        }
        if let Some(note) = &self.note {
            lines.push(format!("NOTE:{}", escape(note)));
        }
        if let Some(birthday) = self.birthday {
            lines.push(format!("BDAY:{}", birthday.format("%Y-%m-%d")));
        }
        if let Some(photo) = &self.photo_url {
            lines.push(format!("PHOTO;VALUE=URI:{}", uri_value(photo)));
        }
        if !self.categories.is_empty() {
            let categories = self.categories.iter().map(|c| escape(c)).collect::<Vec<_>>().join(",");
            lines.push(format!("CATEGORIES:{categories}"));
        }
        if let Some(revision) = self.revision {
            lines.push(format!("REV:{}", revision.format("%Y-%m-%dT%H:%M:%SZ")));
        }
        lines.push("END:VCARD".to_string());

        let mut out = String::new();
        for line in lines {
            out.push_str(&fold(&line));
            out.push_str("\r\n");
        }
        Ok(out)
    }
}

fn type_param(types: &[String]) -> String {
    let types: Vec<String> = types.iter().map(|t| param_value(t)).filter(|t| !t.is_empty()).collect();
    if types.is_empty() {
        String::new()
    } else {
        format!(";TYPE={}", types.join(","))
    }
}

/// `TYPE` values are limited to letters, digits and dashes
fn param_value(value: &str) -> String {
    value.chars().filter(|c| c.is_ascii_alphanumeric() || *c == '-').collect()
}

/// URIs keep their separators but lose control characters, line breaks included
fn uri_value(value: &str) -> String {
    value.chars().filter(|c| !c.is_control()).collect()
}

/// Escape a text value: backslash, comma, semicolon and line breaks
pub fn escape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut chars = value.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '\\' => out.push_str("\\\\"),
            ',' => out.push_str("\\,"),
            ';' => out.push_str("\\;"),
            '\r' => {
                if chars.peek() == Some(&'\n') {
                    chars.next();
                }
                out.push_str("\\n");
            }
            '\n' => out.push_str("\\n"),
            c => out.push(c),
        }
    }
    out
}

/// Fold a content line so no physical line exceeds 75 octets
///
/// Continuation lines start with a single space. Multi-byte characters are
/// never split.
pub fn fold(line: &str) -> String {
    if line.len() <= LINE_LIMIT {
        return line.to_string();
    }

    let mut out = String::with_capacity(line.len() + line.len() / LINE_LIMIT * 3);
    let mut used = 0;
    for c in line.chars() {
        let width = c.len_utf8();
        if used + width > LINE_LIMIT {
            out.push_str("\r\n ");
            // the leading space counts towards the limit
            used = 1;
        }
        out.push(c);
        used += width;
    }
    out
}
