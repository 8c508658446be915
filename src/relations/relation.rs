//! Relation kinds and their inverses

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of relationship recorded between two requirements
///
/// Every storable kind has an inverse, so recording `(a, b) -> r` always implies
/// `(b, a) -> r.inverse()`. New kinds must come with their inverse.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Relation {
    /// No relationship; never stored as an edge
    #[default]
    None,
    /// The primary must be supplied alongside the secondary
    DependsOn,
    /// The primary is depended upon by the secondary
    RequiredBy,
    /// The primary and the secondary must not both be supplied
    Exclusive,
}

impl Relation {
    /// All kinds that may be stored as an edge
    pub const STORABLE: [Relation; 3] = [
        Relation::DependsOn,
        Relation::RequiredBy,
        Relation::Exclusive,
    ];

    /// `false` only for [`Relation::None`]
    #[must_use]
    pub fn is_storable(self) -> bool {
        !matches!(self, Relation::None)
    }

    /// The relation seen from the other end of the edge.
    ///
    /// # Errors
    ///
    /// Returns [`Error::IllegalRelation`] for [`Relation::None`].
    pub fn inverse(self) -> Result<Relation> {
        match self {
            Relation::None => Err(Error::IllegalRelation(self)),
            Relation::DependsOn => Ok(Relation::RequiredBy),
            Relation::RequiredBy => Ok(Relation::DependsOn),
            Relation::Exclusive => Ok(Relation::Exclusive),
        }
    }
}

impl fmt::Display for Relation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Relation::None => "None",
            Relation::DependsOn => "DependsOn",
            Relation::RequiredBy => "RequiredBy",
            Relation::Exclusive => "Exclusive",
        };
        f.write_str(name)
    }
}
