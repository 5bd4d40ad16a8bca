use std::{fmt, str::FromStr};

use larder_db::table::{Ingredient, RecipeIngredient, RecipeTag, Tag};
use sea_query::{DynIden, IntoIden};
use serde::{Deserialize, Deserializer, Serialize, Serializer, de};
use strum::{AsRefStr, Display, EnumString};

/// Monetary amount with two fractional digits, kept as integer cents.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord)]
pub struct Price(i64);

impl Price {
    pub fn from_cents(cents: i64) -> Self {
        Self(cents)
    }

    pub fn cents(&self) -> i64 {
        self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PriceError {
    Empty,
    Negative,
    TooManyDecimals,
    Invalid,
}

impl fmt::Display for PriceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PriceError::Empty => f.write_str("A valid number is required."),
            PriceError::Negative => f.write_str("Ensure this value is greater than or equal to 0."),
            PriceError::TooManyDecimals => {
                f.write_str("Ensure that there are no more than 2 decimal places.")
            }
            PriceError::Invalid => f.write_str("A valid number is required."),
        }
    }
}

impl std::error::Error for PriceError {}

impl FromStr for Price {
    type Err = PriceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(PriceError::Empty);
        }

        if s.starts_with('-') {
            return Err(PriceError::Negative);
        }

        let (whole, frac) = s.split_once('.').unwrap_or((s, ""));
        if frac.len() > 2 {
            return Err(PriceError::TooManyDecimals);
        }

        if (whole.is_empty() && frac.is_empty())
            || !whole.chars().all(|c| c.is_ascii_digit())
            || !frac.chars().all(|c| c.is_ascii_digit())
        {
            return Err(PriceError::Invalid);
        }

        let whole = if whole.is_empty() {
            0
        } else {
            whole.parse::<i64>().map_err(|_| PriceError::Invalid)?
        };

        let frac = match frac.len() {
            0 => 0,
            1 => frac.parse::<i64>().map_err(|_| PriceError::Invalid)? * 10,
            _ => frac.parse::<i64>().map_err(|_| PriceError::Invalid)?,
        };

        whole
            .checked_mul(100)
            .and_then(|v| v.checked_add(frac))
            .map(Self)
            .ok_or(PriceError::Invalid)
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:02}", self.0 / 100, self.0 % 100)
    }
}

impl Serialize for Price {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

struct PriceVisitor;

impl de::Visitor<'_> for PriceVisitor {
    type Value = Price;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a decimal number with at most 2 fractional digits")
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
        v.parse().map_err(E::custom)
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
        i64::try_from(v)
            .ok()
            .and_then(|v| v.checked_mul(100))
            .map(Price)
            .ok_or_else(|| E::custom(PriceError::Invalid))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
        if v < 0 {
            return Err(E::custom(PriceError::Negative));
        }

        self.visit_u64(v as u64)
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Self::Value, E> {
        if !v.is_finite() {
            return Err(E::custom(PriceError::Invalid));
        }

        // Shortest round-trip formatting keeps 5.3 as "5.3".
        self.visit_str(&v.to_string())
    }
}

impl<'de> Deserialize<'de> for Price {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(PriceVisitor)
    }
}

/// Tags and ingredients share one shape, this selects which table backs it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, AsRefStr, EnumString)]
#[strum(serialize_all = "snake_case")]
pub enum ItemKind {
    Tag,
    Ingredient,
}

impl ItemKind {
    pub(crate) fn table(self) -> DynIden {
        match self {
            ItemKind::Tag => Tag::Table.into_iden(),
            ItemKind::Ingredient => Ingredient::Table.into_iden(),
        }
    }

    pub(crate) fn id(self) -> DynIden {
        match self {
            ItemKind::Tag => Tag::Id.into_iden(),
            ItemKind::Ingredient => Ingredient::Id.into_iden(),
        }
    }

    pub(crate) fn owner_id(self) -> DynIden {
        match self {
            ItemKind::Tag => Tag::OwnerId.into_iden(),
            ItemKind::Ingredient => Ingredient::OwnerId.into_iden(),
        }
    }

    pub(crate) fn name(self) -> DynIden {
        match self {
            ItemKind::Tag => Tag::Name.into_iden(),
            ItemKind::Ingredient => Ingredient::Name.into_iden(),
        }
    }

    pub(crate) fn link_table(self) -> DynIden {
        match self {
            ItemKind::Tag => RecipeTag::Table.into_iden(),
            ItemKind::Ingredient => RecipeIngredient::Table.into_iden(),
        }
    }

    pub(crate) fn link_recipe_id(self) -> DynIden {
        match self {
            ItemKind::Tag => RecipeTag::RecipeId.into_iden(),
            ItemKind::Ingredient => RecipeIngredient::RecipeId.into_iden(),
        }
    }

    pub(crate) fn link_item_id(self) -> DynIden {
        match self {
            ItemKind::Tag => RecipeTag::TagId.into_iden(),
            ItemKind::Ingredient => RecipeIngredient::IngredientId.into_iden(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct Item {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Recipe {
    pub id: i64,
    pub owner_id: i64,
    pub title: String,
    pub time_minutes: i64,
    pub price: Price,
    pub description: String,
    pub link: String,
    pub image: Option<String>,
    pub tags: Vec<Item>,
    pub ingredients: Vec<Item>,
}

/// Recipe list filter, each set matches recipes linked to any of its ids.
#[derive(Debug, Clone, Default)]
pub struct RecipeFilter {
    pub tags: Option<Vec<i64>>,
    pub ingredients: Option<Vec<i64>>,
}
