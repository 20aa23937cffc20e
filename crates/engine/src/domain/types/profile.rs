use super::core::Country;

/// Wire format of the JSON document served by a country endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseFormat {
    /// `{ "epochUTC": .., "trustList": { "timeStamp", "trustListSignature", "trustListContent" } }`
    GreenCheckMasterData,
}

/// Static description of where and how a country publishes its trust list.
#[derive(Debug, Clone, Copy)]
pub struct CountryProfile {
    pub country: Country,
    pub endpoint: &'static str,
    /// Trust anchor PEM, relative to the configured anchors directory.
    pub trust_anchor: &'static str,
    pub format: ResponseFormat,
}

// Root certificate published at
// https://github.com/Federal-Ministry-of-Health-AT/green-pass-overview/
static AUSTRIA: CountryProfile = CountryProfile {
    country: Country::Austria,
    endpoint: "https://greencheck.gv.at/api/masterdata",
    trust_anchor: "roots/Austria-prod.pem",
    format: ResponseFormat::GreenCheckMasterData,
};

impl Country {
    pub fn profile(self) -> &'static CountryProfile {
        match self {
            Country::Austria => &AUSTRIA,
        }
    }
}
