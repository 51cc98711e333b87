//! Region, country and venue taxonomy.
//!
//! The taxonomy is closed and fixed at compile time. A country does not own
//! its venues directly: it owns a short list of keyword fragments, and a venue
//! belongs to the country when its canonical name contains any of them.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{Result, ScoutError};

/// A selectable group of countries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Region {
    #[serde(rename = "Southeast Asia")]
    SoutheastAsia,
    Europe,
    #[serde(rename = "Middle East")]
    MiddleEast,
    Americas,
}

impl Region {
    pub const ALL: [Region; 4] = [
        Region::SoutheastAsia,
        Region::Europe,
        Region::MiddleEast,
        Region::Americas,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Region::SoutheastAsia => "Southeast Asia",
            Region::Europe => "Europe",
            Region::MiddleEast => "Middle East",
            Region::Americas => "Americas",
        }
    }

    /// Countries in display order. May be empty.
    pub fn countries(&self) -> &'static [Country] {
        match self {
            Region::SoutheastAsia => &[
                Country::Thailand,
                Country::Singapore,
                Country::Malaysia,
                Country::Vietnam,
                Country::Indonesia,
            ],
            Region::Europe => &[Country::Germany],
            Region::MiddleEast => &[Country::UnitedArabEmirates],
            Region::Americas => &[],
        }
    }

    /// Countries of a selectable region.
    ///
    /// Returns [`ScoutError::EmptyRegion`] for a region with no countries so
    /// the caller can refuse the selection.
    pub fn countries_checked(&self) -> Result<&'static [Country]> {
        let countries = self.countries();
        if countries.is_empty() {
            return Err(ScoutError::EmptyRegion(*self));
        }
        Ok(countries)
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Region {
    type Err = ScoutError;

    fn from_str(s: &str) -> Result<Self> {
        parse_by_name(s, &Region::ALL, Region::name, "region")
    }
}

/// A supported country.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Country {
    Thailand,
    Singapore,
    Malaysia,
    Vietnam,
    Indonesia,
    Germany,
    #[serde(rename = "United Arab Emirates")]
    UnitedArabEmirates,
}

impl Country {
    pub const ALL: [Country; 7] = [
        Country::Thailand,
        Country::Singapore,
        Country::Malaysia,
        Country::Vietnam,
        Country::Indonesia,
        Country::Germany,
        Country::UnitedArabEmirates,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Country::Thailand => "Thailand",
            Country::Singapore => "Singapore",
            Country::Malaysia => "Malaysia",
            Country::Vietnam => "Vietnam",
            Country::Indonesia => "Indonesia",
            Country::Germany => "Germany",
            Country::UnitedArabEmirates => "United Arab Emirates",
        }
    }

    /// Lowercase fragments identifying this country's venues.
    fn venue_keywords(&self) -> &'static [&'static str] {
        match self {
            Country::Thailand => &["impact", "bitec", "sirikit"],
            Country::Singapore => &["marina bay", "singapore"],
            Country::Malaysia => &["kuala lumpur"],
            Country::Vietnam => &["saigon", "hanoi"],
            Country::Indonesia => &["jakarta", "indonesia"],
            Country::Germany => &["messe"],
            Country::UnitedArabEmirates => &["dubai", "abu dhabi"],
        }
    }

    /// Venues valid for this country, in enumeration order.
    pub fn venues(&self) -> Vec<Venue> {
        let keywords = self.venue_keywords();
        Venue::ALL
            .iter()
            .copied()
            .filter(|venue| {
                let name = venue.name().to_lowercase();
                keywords.iter().any(|k| name.contains(k))
            })
            .collect()
    }

    /// Region this country is listed under.
    pub fn region(&self) -> Region {
        Region::ALL
            .iter()
            .copied()
            .find(|r| r.countries().contains(self))
            .unwrap_or(Region::SoutheastAsia)
    }
}

impl fmt::Display for Country {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Country {
    type Err = ScoutError;

    fn from_str(s: &str) -> Result<Self> {
        if s.trim().eq_ignore_ascii_case("uae") {
            return Ok(Country::UnitedArabEmirates);
        }
        parse_by_name(s, &Country::ALL, Country::name, "country")
    }
}

/// A known exhibition venue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Venue {
    #[serde(rename = "Impact Arena & Exhibition Center")]
    ImpactArena,
    #[serde(rename = "BITEC Bangna")]
    BitecBangna,
    #[serde(rename = "Queen Sirikit National Convention Center")]
    QueenSirikit,
    #[serde(rename = "Marina Bay Sands Expo")]
    MarinaBaySands,
    #[serde(rename = "Singapore Expo")]
    SingaporeExpo,
    #[serde(rename = "Suntec Singapore Convention Centre")]
    Suntec,
    #[serde(rename = "Kuala Lumpur Convention Centre")]
    KualaLumpurConvention,
    #[serde(rename = "MITEC Kuala Lumpur")]
    Mitec,
    #[serde(rename = "Saigon Exhibition and Convention Center")]
    Secc,
    #[serde(rename = "Hanoi International Exhibition Center")]
    HanoiExhibition,
    #[serde(rename = "Jakarta International Expo")]
    JakartaExpo,
    #[serde(rename = "Indonesia Convention Exhibition")]
    IndonesiaConvention,
    #[serde(rename = "Messe Frankfurt")]
    MesseFrankfurt,
    #[serde(rename = "Messe Munich")]
    MesseMunich,
    #[serde(rename = "Messe Düsseldorf")]
    MesseDusseldorf,
    #[serde(rename = "Dubai World Trade Centre")]
    DubaiWorldTrade,
    #[serde(rename = "Abu Dhabi National Exhibition Centre")]
    AbuDhabiExhibition,
}

impl Venue {
    pub const ALL: [Venue; 17] = [
        Venue::ImpactArena,
        Venue::BitecBangna,
        Venue::QueenSirikit,
        Venue::MarinaBaySands,
        Venue::SingaporeExpo,
        Venue::Suntec,
        Venue::KualaLumpurConvention,
        Venue::Mitec,
        Venue::Secc,
        Venue::HanoiExhibition,
        Venue::JakartaExpo,
        Venue::IndonesiaConvention,
        Venue::MesseFrankfurt,
        Venue::MesseMunich,
        Venue::MesseDusseldorf,
        Venue::DubaiWorldTrade,
        Venue::AbuDhabiExhibition,
    ];

    /// Canonical display name.
    pub fn name(&self) -> &'static str {
        match self {
            Venue::ImpactArena => "Impact Arena & Exhibition Center",
            Venue::BitecBangna => "BITEC Bangna",
            Venue::QueenSirikit => "Queen Sirikit National Convention Center",
            Venue::MarinaBaySands => "Marina Bay Sands Expo",
            Venue::SingaporeExpo => "Singapore Expo",
            Venue::Suntec => "Suntec Singapore Convention Centre",
            Venue::KualaLumpurConvention => "Kuala Lumpur Convention Centre",
            Venue::Mitec => "MITEC Kuala Lumpur",
            Venue::Secc => "Saigon Exhibition and Convention Center",
            Venue::HanoiExhibition => "Hanoi International Exhibition Center",
            Venue::JakartaExpo => "Jakarta International Expo",
            Venue::IndonesiaConvention => "Indonesia Convention Exhibition",
            Venue::MesseFrankfurt => "Messe Frankfurt",
            Venue::MesseMunich => "Messe Munich",
            Venue::MesseDusseldorf => "Messe Düsseldorf",
            Venue::DubaiWorldTrade => "Dubai World Trade Centre",
            Venue::AbuDhabiExhibition => "Abu Dhabi National Exhibition Centre",
        }
    }

    /// First whitespace-delimited word of the canonical name.
    pub fn first_word(&self) -> &'static str {
        self.name().split_whitespace().next().unwrap_or_default()
    }
}

impl fmt::Display for Venue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Venue {
    type Err = ScoutError;

    fn from_str(s: &str) -> Result<Self> {
        parse_by_name(s, &Venue::ALL, Venue::name, "venue")
    }
}

fn parse_by_name<T: Copy>(
    input: &str,
    all: &[T],
    name: fn(&T) -> &'static str,
    kind: &'static str,
) -> Result<T> {
    let wanted = normalize(input);
    all.iter()
        .copied()
        .find(|item| normalize(name(item)) == wanted)
        .ok_or_else(|| ScoutError::UnknownName {
            kind,
            value: input.to_string(),
        })
}

fn normalize(s: &str) -> String {
    s.chars()
        .filter(|c| c.is_alphanumeric())
        .flat_map(char::to_lowercase)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_country_has_venues() {
        for country in Country::ALL {
            assert!(!country.venues().is_empty(), "{} has no venues", country);
        }
    }

    #[test]
    fn test_every_venue_belongs_to_exactly_one_country() {
        for venue in Venue::ALL {
            let owners: Vec<_> = Country::ALL
                .iter()
                .filter(|c| c.venues().contains(&venue))
                .collect();
            assert_eq!(owners.len(), 1, "{} owned by {:?}", venue, owners);
        }
    }

    #[test]
    fn test_thailand_venues_in_enumeration_order() {
        assert_eq!(
            Country::Thailand.venues(),
            vec![Venue::ImpactArena, Venue::BitecBangna, Venue::QueenSirikit]
        );
    }

    #[test]
    fn test_empty_region_is_rejected() {
        assert!(matches!(
            Region::Americas.countries_checked(),
            Err(ScoutError::EmptyRegion(Region::Americas))
        ));
        assert_eq!(Region::Europe.countries_checked().unwrap(), &[Country::Germany]);
    }

    #[test]
    fn test_country_region_lookup() {
        assert_eq!(Country::Singapore.region(), Region::SoutheastAsia);
        assert_eq!(Country::UnitedArabEmirates.region(), Region::MiddleEast);
    }

    #[test]
    fn test_parse_names_case_insensitively() {
        assert_eq!("singapore".parse::<Country>().unwrap(), Country::Singapore);
        assert_eq!(
            "united-arab-emirates".parse::<Country>().unwrap(),
            Country::UnitedArabEmirates
        );
        assert_eq!("UAE".parse::<Country>().unwrap(), Country::UnitedArabEmirates);
        assert_eq!("bitec bangna".parse::<Venue>().unwrap(), Venue::BitecBangna);
        assert_eq!("southeast asia".parse::<Region>().unwrap(), Region::SoutheastAsia);
        assert!("Atlantis".parse::<Country>().is_err());
    }

    #[test]
    fn test_serde_uses_display_names() {
        let json = serde_json::to_string(&Venue::ImpactArena).unwrap();
        assert_eq!(json, "\"Impact Arena & Exhibition Center\"");
        let back: Country = serde_json::from_str("\"United Arab Emirates\"").unwrap();
        assert_eq!(back, Country::UnitedArabEmirates);
    }

    #[test]
    fn test_first_word() {
        assert_eq!(Venue::BitecBangna.first_word(), "BITEC");
        assert_eq!(Venue::MesseMunich.first_word(), "Messe");
    }
}
