//! [`Catalog`]-related definitions.

use derive_more::From;
use juniper::{graphql_object, GraphQLEnum};
use service::read;

use crate::{api, Context};

/// Storefront of a single provider.
#[derive(Clone, Debug, From)]
pub struct Catalog(read::Catalog);

/// Storefront of a single provider: its active services and available store
/// products.
#[graphql_object(context = Context)]
impl Catalog {
    /// Active service `Offer`s of the provider.
    pub fn services(&self) -> Vec<api::offer::Service> {
        self.0.services.iter().cloned().map(Into::into).collect()
    }

    /// Available store `Product`s of the provider.
    pub fn products(&self) -> Vec<api::offer::Product> {
        self.0.products.iter().cloned().map(Into::into).collect()
    }

    /// Way this `Catalog` should be browsed.
    pub fn mode(&self) -> Mode {
        self.0.mode().into()
    }
}

/// Way a `Catalog` is browsed.
#[derive(Clone, Copy, Debug, GraphQLEnum)]
#[graphql(name = "CatalogMode")]
pub enum Mode {
    /// Both services and products are sold, so the resident picks what to
    /// browse.
    Hybrid,

    /// Only services are sold.
    Services,

    /// Only products are sold.
    Products,

    /// Nothing is sold.
    Empty,
}

impl From<read::catalog::Mode> for Mode {
    fn from(mode: read::catalog::Mode) -> Self {
        use read::catalog::Mode as M;
        match mode {
            M::Hybrid => Self::Hybrid,
            M::Services => Self::Services,
            M::Products => Self::Products,
            M::Empty => Self::Empty,
        }
    }
}
