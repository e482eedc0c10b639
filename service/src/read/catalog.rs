//! Provider [`Catalog`] definitions.

use crate::domain::{
    offer::{Product, Service},
    profile, Offer,
};
#[cfg(doc)]
use crate::domain::{offer::product::Purpose, Profile};

/// Everything a provider currently sells in their storefront.
#[derive(Clone, Debug, Default)]
pub struct Catalog {
    /// Active [`Service`]s of the provider.
    pub services: Vec<Service>,

    /// Available [`Purpose::Store`] [`Product`]s of the provider.
    pub products: Vec<Product>,
}

impl Catalog {
    /// Assembles the [`Catalog`] of the provided provider out of its
    /// [`Offer`]s, skipping the ones not on sale in the storefront.
    #[must_use]
    pub fn assemble(
        provider_id: profile::Id,
        offers: impl IntoIterator<Item = Offer>,
    ) -> Self {
        let mut catalog = Self::default();
        for offer in offers {
            match offer {
                Offer::Service(s)
                    if s.provider_id == provider_id && s.is_active =>
                {
                    catalog.services.push(s);
                }
                Offer::Product(p) if p.is_in_storefront_of(provider_id) => {
                    catalog.products.push(p);
                }
                Offer::Service(_) | Offer::Product(_) => {}
            }
        }
        catalog
    }

    /// Returns the [`Mode`] this [`Catalog`] should be browsed in.
    #[must_use]
    pub fn mode(&self) -> Mode {
        match (self.services.is_empty(), self.products.is_empty()) {
            (false, false) => Mode::Hybrid,
            (false, true) => Mode::Services,
            (true, false) => Mode::Products,
            (true, true) => Mode::Empty,
        }
    }
}

/// Way a [`Catalog`] is browsed.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Mode {
    /// Both [`Service`]s and [`Product`]s are sold, so the resident picks
    /// what to browse.
    Hybrid,

    /// Only [`Service`]s are sold.
    Services,

    /// Only [`Product`]s are sold.
    Products,

    /// Nothing is sold.
    Empty,
}

#[cfg(test)]
mod spec {
    use common::DateTime;

    use crate::domain::{
        offer::{self, product::Purpose, Description, Product, Service},
        profile, Offer,
    };

    use super::{Catalog, Mode};

    fn service(provider_id: profile::Id, is_active: bool) -> Offer {
        Offer::Service(Service {
            id: offer::Id::new(),
            provider_id,
            title: "Escova".parse().unwrap(),
            description: Description::default(),
            price: "50.00".parse().unwrap(),
            duration: None,
            image: None,
            is_active,
            created_at: DateTime::now().coerce(),
        })
    }

    fn product(
        seller_id: profile::Id,
        is_available: bool,
        purpose: Purpose,
    ) -> Offer {
        Offer::Product(Product {
            id: offer::Id::new(),
            seller_id,
            title: "Brigadeiro".parse().unwrap(),
            description: Description::default(),
            price: "3.00".parse().unwrap(),
            images: vec![],
            is_available,
            purpose,
            condition: None,
            category: None,
            contact_phone: None,
            created_at: DateTime::now().coerce(),
        })
    }

    #[test]
    fn keeps_only_storefront_offers() {
        let provider = profile::Id::new();

        let catalog = Catalog::assemble(
            provider,
            [
                service(provider, true),
                service(provider, false),
                product(provider, true, Purpose::Store),
                product(provider, false, Purpose::Store),
                product(provider, true, Purpose::Desapego),
                service(profile::Id::new(), true),
            ],
        );

        assert_eq!(catalog.services.len(), 1);
        assert!(catalog.services.iter().all(|s| s.is_active));
        assert_eq!(catalog.products.len(), 1);
        assert!(catalog
            .products
            .iter()
            .all(|p| p.is_available && p.purpose == Purpose::Store));
        assert_eq!(catalog.mode(), Mode::Hybrid);
    }

    #[test]
    fn mode_follows_contents() {
        let provider = profile::Id::new();

        let services = Catalog::assemble(provider, [service(provider, true)]);
        assert_eq!(services.mode(), Mode::Services);

        let products = Catalog::assemble(
            provider,
            [product(provider, true, Purpose::Store)],
        );
        assert_eq!(products.mode(), Mode::Products);

        assert_eq!(Catalog::assemble(provider, []).mode(), Mode::Empty);
    }
}
