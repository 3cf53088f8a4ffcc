use crate::value::ValueTag;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Field names a record may carry.
///
/// Declaration order is the rendering order: records print their fields
/// sorted by key, so `KIND` always comes first and `SUBJECT` last.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub enum FieldKey {
    Kind,
    Title,
    Last,
    First,
    Year,
    Genre,
    Region,
    Subject,
}

impl FieldKey {
    pub const ALL: [FieldKey; 8] = [
        FieldKey::Kind,
        FieldKey::Title,
        FieldKey::Last,
        FieldKey::First,
        FieldKey::Year,
        FieldKey::Genre,
        FieldKey::Region,
        FieldKey::Subject,
    ];

    /// Upper-case label used in rendered records (`TITLE`, `YEAR`, ...).
    pub fn as_str(self) -> &'static str {
        match self {
            FieldKey::Kind => "KIND",
            FieldKey::Title => "TITLE",
            FieldKey::Last => "LAST",
            FieldKey::First => "FIRST",
            FieldKey::Year => "YEAR",
            FieldKey::Genre => "GENRE",
            FieldKey::Region => "REGION",
            FieldKey::Subject => "SUBJECT",
        }
    }

    /// Lower-case name used in catalogue documents and JSON output.
    pub fn field_name(self) -> &'static str {
        match self {
            FieldKey::Kind => "kind",
            FieldKey::Title => "title",
            FieldKey::Last => "last",
            FieldKey::First => "first",
            FieldKey::Year => "year",
            FieldKey::Genre => "genre",
            FieldKey::Region => "region",
            FieldKey::Subject => "subject",
        }
    }

    /// Case-insensitive lookup by name.
    pub fn parse(value: &str) -> Option<Self> {
        let value = value.trim();
        Self::ALL
            .into_iter()
            .find(|key| key.as_str().eq_ignore_ascii_case(value))
    }

    /// The value tag this key is bound to. The binding is static and shared by
    /// every schema that admits the key.
    pub fn tag(self) -> ValueTag {
        match self {
            FieldKey::Title | FieldKey::Last | FieldKey::First => ValueTag::Text,
            FieldKey::Year => ValueTag::Integer,
            FieldKey::Kind => ValueTag::Categorical(Enumeration::Kind),
            FieldKey::Genre => ValueTag::Categorical(Enumeration::Genre),
            FieldKey::Region => ValueTag::Categorical(Enumeration::Region),
            FieldKey::Subject => ValueTag::Categorical(Enumeration::Subject),
        }
    }
}

impl fmt::Display for FieldKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Names of the closed enumerations a categorical value can come from.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub enum Enumeration {
    Kind,
    Genre,
    Region,
    Subject,
}

impl Enumeration {
    pub fn as_str(self) -> &'static str {
        match self {
            Enumeration::Kind => "kind",
            Enumeration::Genre => "genre",
            Enumeration::Region => "region",
            Enumeration::Subject => "subject",
        }
    }
}

impl fmt::Display for Enumeration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// Each enumeration carries an `Unspecified` variant that acts as its wildcard.
macro_rules! choice_enum {
    ($(#[$meta:meta])* $name:ident { $($variant:ident => $label:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
        pub enum $name {
            $($variant,)+
            Unspecified,
        }

        impl $name {
            /// Every concrete variant, wildcard excluded.
            pub const VARIANTS: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(self) -> &'static str {
                match self {
                    $($name::$variant => $label,)+
                    $name::Unspecified => "unspecified",
                }
            }

            pub fn parse(value: &str) -> Option<Self> {
                let value = value.trim();
                if value.eq_ignore_ascii_case("unspecified") {
                    return Some($name::Unspecified);
                }
                Self::VARIANTS
                    .iter()
                    .copied()
                    .find(|variant| variant.as_str().eq_ignore_ascii_case(value))
            }

            pub fn is_unspecified(self) -> bool {
                self == $name::Unspecified
            }
        }

        impl Default for $name {
            fn default() -> Self {
                $name::Unspecified
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl Serialize for $name {
            fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
            where
                S: Serializer,
            {
                serializer.serialize_str(self.as_str())
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
            where
                D: Deserializer<'de>,
            {
                let value = String::deserialize(deserializer)?;
                Self::parse(&value).ok_or_else(|| {
                    serde::de::Error::custom(format!(
                        "unknown {} '{}'",
                        stringify!($name).to_lowercase(),
                        value
                    ))
                })
            }
        }
    };
}

choice_enum!(
    /// Record category. Decides which schema validated a record and which
    /// queries it can answer.
    Kind {
        Fiction => "fiction",
        Cookbook => "cookbook",
        HowTo => "howto",
    }
);

choice_enum!(Genre {
    Adventure => "adventure",
    Classics => "classics",
    Detective => "detective",
    Fantasy => "fantasy",
    Historic => "historic",
    Horror => "horror",
    Romance => "romance",
    SciFi => "scifi",
});

choice_enum!(Region {
    China => "china",
    France => "france",
    India => "india",
    Italy => "italy",
    Mexico => "mexico",
    Persia => "persia",
    Us => "us",
});

choice_enum!(Subject {
    Drawing => "drawing",
    Painting => "painting",
    Writing => "writing",
});

/// One variant drawn from one of the closed enumerations.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum Choice {
    Kind(Kind),
    Genre(Genre),
    Region(Region),
    Subject(Subject),
}

impl Choice {
    pub fn enumeration(self) -> Enumeration {
        match self {
            Choice::Kind(_) => Enumeration::Kind,
            Choice::Genre(_) => Enumeration::Genre,
            Choice::Region(_) => Enumeration::Region,
            Choice::Subject(_) => Enumeration::Subject,
        }
    }

    pub fn variant_name(self) -> &'static str {
        match self {
            Choice::Kind(v) => v.as_str(),
            Choice::Genre(v) => v.as_str(),
            Choice::Region(v) => v.as_str(),
            Choice::Subject(v) => v.as_str(),
        }
    }

    pub fn is_unspecified(self) -> bool {
        match self {
            Choice::Kind(v) => v.is_unspecified(),
            Choice::Genre(v) => v.is_unspecified(),
            Choice::Region(v) => v.is_unspecified(),
            Choice::Subject(v) => v.is_unspecified(),
        }
    }

    /// The wildcard variant of `enumeration`.
    pub fn unspecified(enumeration: Enumeration) -> Self {
        match enumeration {
            Enumeration::Kind => Choice::Kind(Kind::Unspecified),
            Enumeration::Genre => Choice::Genre(Genre::Unspecified),
            Enumeration::Region => Choice::Region(Region::Unspecified),
            Enumeration::Subject => Choice::Subject(Subject::Unspecified),
        }
    }

    pub fn parse(enumeration: Enumeration, value: &str) -> Option<Self> {
        match enumeration {
            Enumeration::Kind => Kind::parse(value).map(Choice::Kind),
            Enumeration::Genre => Genre::parse(value).map(Choice::Genre),
            Enumeration::Region => Region::parse(value).map(Choice::Region),
            Enumeration::Subject => Subject::parse(value).map(Choice::Subject),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_keys_parse_case_insensitively() {
        assert_eq!(FieldKey::parse("title"), Some(FieldKey::Title));
        assert_eq!(FieldKey::parse(" YEAR "), Some(FieldKey::Year));
        assert_eq!(FieldKey::parse("Subject"), Some(FieldKey::Subject));
        assert_eq!(FieldKey::parse("isbn"), None);
    }

    #[test]
    fn field_key_order_follows_declaration() {
        let mut keys = vec![FieldKey::Genre, FieldKey::Kind, FieldKey::Last, FieldKey::Title];
        keys.sort();
        assert_eq!(
            keys,
            vec![FieldKey::Kind, FieldKey::Title, FieldKey::Last, FieldKey::Genre]
        );
    }

    #[test]
    fn keys_bind_to_matching_enumerations() {
        assert_eq!(FieldKey::Title.tag(), ValueTag::Text);
        assert_eq!(FieldKey::Year.tag(), ValueTag::Integer);
        assert_eq!(
            FieldKey::Region.tag(),
            ValueTag::Categorical(Enumeration::Region)
        );
    }

    #[test]
    fn choice_enums_round_trip_through_serde() {
        let json = serde_json::to_string(&Genre::SciFi).unwrap();
        assert_eq!(json, "\"scifi\"");
        let back: Genre = serde_json::from_str("\"SciFi\"").unwrap();
        assert_eq!(back, Genre::SciFi);

        let err = serde_json::from_str::<Region>("\"atlantis\"").unwrap_err();
        assert!(err.to_string().contains("unknown region 'atlantis'"));
    }

    #[test]
    fn unspecified_is_the_default_and_not_listed() {
        assert_eq!(Kind::default(), Kind::Unspecified);
        assert!(!Subject::VARIANTS.contains(&Subject::Unspecified));
        assert_eq!(Kind::parse("Unspecified"), Some(Kind::Unspecified));
        assert!(Choice::unspecified(Enumeration::Genre).is_unspecified());
    }
}
