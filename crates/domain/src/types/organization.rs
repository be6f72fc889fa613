//! Company record

use serde::{Deserialize, Serialize};

/// A company or establishment as known from registries
///
/// Identifiers are stored as given; validation lives in
/// `helpkit_common::organization`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Organization {
    pub name: String,
    pub siren: Option<String>,
    pub siret: Option<String>,
    /// NAF/APE activity code, e.g. `62.01Z`
    pub naf: Option<String>,
    pub vat_number: Option<String>,
    pub address_lines: Vec<String>,
    pub postal_code: Option<String>,
    pub city: Option<String>,
    /// ISO 3166-1 alpha-2
    pub country_code: Option<String>,
}

impl Organization {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), ..Self::default() }
    }

    pub fn with_siren(mut self, siren: impl Into<String>) -> Self {
        self.siren = Some(siren.into());
        self
    }

    pub fn with_siret(mut self, siret: impl Into<String>) -> Self {
        self.siret = Some(siret.into());
        self
    }

    pub fn with_naf(mut self, naf: impl Into<String>) -> Self {
        self.naf = Some(naf.into());
        self
    }

    pub fn with_vat_number(mut self, vat: impl Into<String>) -> Self {
        self.vat_number = Some(vat.into());
        self
    }

    pub fn with_address_line(mut self, line: impl Into<String>) -> Self {
        self.address_lines.push(line.into());
        self
    }

    pub fn with_locality(
        mut self,
        postal_code: impl Into<String>,
        city: impl Into<String>,
        country_code: impl Into<String>,
    ) -> Self {
        self.postal_code = Some(postal_code.into());
        self.city = Some(city.into());
        self.country_code = Some(country_code.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn siren(&self) -> Option<&str> {
        self.siren.as_deref()
    }

    pub fn siret(&self) -> Option<&str> {
        self.siret.as_deref()
    }

    pub fn naf(&self) -> Option<&str> {
        self.naf.as_deref()
    }

    pub fn vat_number(&self) -> Option<&str> {
        self.vat_number.as_deref()
    }

    /// Establishment number (NIC): the last five digits of the SIRET
    pub fn establishment_number(&self) -> Option<&str> {
        let siret = self.siret.as_deref()?;
        if siret.len() == 14 && siret.is_ascii() {
            Some(&siret[9..])
        } else {
            None
        }
    }

    /// Address lines followed by "postal code city", skipping blanks
    pub fn postal_address(&self) -> Vec<String> {
        let mut lines: Vec<String> =
            self.address_lines.iter().filter(|l| !l.trim().is_empty()).cloned().collect();

        let locality = [self.postal_code.as_deref(), self.city.as_deref()]
            .into_iter()
            .flatten()
            .filter(|part| !part.trim().is_empty())
            .collect::<Vec<_>>()
            .join(" ");
        if !locality.is_empty() {
            lines.push(locality);
        }
        lines
    }
}
