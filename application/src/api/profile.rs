//! [`Profile`]-related definitions.

use std::future;

use common::DateTime;
use derive_more::{AsRef, Display, From, Into};
use futures::TryFutureExt as _;
use juniper::{graphql_object, GraphQLEnum, GraphQLScalar};
use service::{domain, query, Query as _};
use tokio::sync::OnceCell;
use uuid::Uuid;

use crate::{
    api::{self, scalar},
    AsError, Context, Error,
};

/// A [`Profile`] of a marketplace member.
#[derive(Clone, Debug, From)]
pub struct Profile {
    /// ID of this [`Profile`].
    pub id: Id,

    /// [`domain::Profile`] representing this [`Profile`].
    profile: OnceCell<domain::Profile>,
}

impl From<domain::Profile> for Profile {
    fn from(profile: domain::Profile) -> Self {
        Self {
            id: profile.id.into(),
            profile: OnceCell::new_with(Some(profile)),
        }
    }
}

impl Profile {
    /// Creates a new [`Profile`] with the provided ID.
    ///
    /// # Safety
    ///
    /// Caller must ensure that [`Profile`] with the provided ID exists,
    /// otherwise accessing this [`Profile`] will result with an error.
    #[expect(unsafe_code, reason = "bypass")]
    #[must_use]
    pub unsafe fn new_unchecked(id: impl Into<Id>) -> Self {
        Self {
            id: id.into(),
            profile: OnceCell::new(),
        }
    }

    /// Returns the [`domain::Profile`] representing this [`Profile`].
    ///
    /// # Errors
    ///
    /// Error if the [`domain::Profile`] doesn't exist.
    async fn profile(&self, ctx: &Context) -> Result<&domain::Profile, Error> {
        let id = self.id.into();
        self.profile
            .get_or_try_init(|| {
                ctx.service()
                    .execute(query::profile::ById::by(id))
                    .map_err(AsError::into_error)
                    .map_err(ctx.error())
                    .and_then(|p| {
                        future::ready(p.ok_or_else(|| {
                            api::query::ProfileError::NotExists.into()
                        }))
                    })
            })
            .await
    }
}

/// A `Profile` of a marketplace member.
#[graphql_object(context = Context)]
impl Profile {
    /// Unique identifier of this `Profile`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Profile.id",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub fn id(&self) -> Id {
        self.id
    }

    /// Full name of this `Profile`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Profile.name",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn name(&self, ctx: &Context) -> Result<Name, Error> {
        Ok(self.profile(ctx).await?.name.clone().into())
    }

    /// Role of this `Profile`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Profile.role",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn role(&self, ctx: &Context) -> Result<Role, Error> {
        Ok(self.profile(ctx).await?.role.into())
    }

    /// What this `Profile` mainly offers, if it's a provider.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Profile.providerKind",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn provider_kind(
        &self,
        ctx: &Context,
    ) -> Result<Option<ProviderKind>, Error> {
        Ok(self.profile(ctx).await?.provider_kind.map(Into::into))
    }

    /// Contact phone of this `Profile`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Profile.phone",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn phone(&self, ctx: &Context) -> Result<Option<Phone>, Error> {
        Ok(self.profile(ctx).await?.phone.clone().map(Into::into))
    }

    /// Address of this `Profile` inside the residential complex.
    ///
    /// Visible to the `Profile` itself and to the platform admins only.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Profile.address",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn address(
        &self,
        ctx: &Context,
    ) -> Result<Option<Address>, Error> {
        let me = ctx.try_current_session().await?.map(|s| s.profile);
        let visible = me.is_some_and(|p| p.id == self.id.into() || p.is_admin);

        Ok(if visible {
            self.profile(ctx).await?.address.clone().map(Into::into)
        } else {
            None
        })
    }

    /// Name of the residential complex this `Profile` lives in.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Profile.condoName",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn condo_name(
        &self,
        ctx: &Context,
    ) -> Result<Option<CondoName>, Error> {
        Ok(self.profile(ctx).await?.condo_name.clone().map(Into::into))
    }

    /// Tax document of this `Profile`, if it's a provider.
    ///
    /// Visible to the `Profile` itself and to the platform admins only.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Profile.document",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn document(
        &self,
        ctx: &Context,
    ) -> Result<Option<Document>, Error> {
        let me = ctx.try_current_session().await?.map(|s| s.profile);
        let visible = me.is_some_and(|p| p.id == self.id.into() || p.is_admin);

        Ok(if visible {
            self.profile(ctx).await?.document.clone().map(Into::into)
        } else {
            None
        })
    }

    /// Categories this `Profile` works in, if it's a provider.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Profile.categories",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn categories(
        &self,
        ctx: &Context,
    ) -> Result<Vec<api::offer::Category>, Error> {
        Ok(self
            .profile(ctx)
            .await?
            .categories
            .iter()
            .cloned()
            .map(Into::into)
            .collect())
    }

    /// Indicator whether this `Profile` operates the platform.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Profile.isAdmin",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn is_admin(&self, ctx: &Context) -> Result<bool, Error> {
        Ok(self.profile(ctx).await?.is_admin)
    }

    /// `DateTime` when this `Profile` was created.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Profile.createdAt",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn created_at(&self, ctx: &Context) -> Result<DateTime, Error> {
        Ok(self.profile(ctx).await?.created_at.coerce())
    }
}

/// Unique identifier of a `Profile`.
#[derive(
    Clone, Copy, Debug, Display, Eq, From, GraphQLScalar, Into, PartialEq,
)]
#[from(domain::profile::Id)]
#[into(domain::profile::Id)]
#[graphql(name = "ProfileId", transparent)]
pub struct Id(Uuid);

/// Full name of a `Profile`.
#[derive(AsRef, Clone, Debug, Display, From, GraphQLScalar, Into)]
#[graphql(
    name = "ProfileName",
    with = scalar::Via::<domain::profile::Name>,
)]
pub struct Name(domain::profile::Name);

/// Contact phone of a `Profile`.
#[derive(AsRef, Clone, Debug, Display, From, GraphQLScalar, Into)]
#[graphql(
    name = "ProfilePhone",
    with = scalar::Via::<domain::profile::Phone>,
)]
pub struct Phone(domain::profile::Phone);

/// Address of a `Profile` inside the residential complex.
#[derive(AsRef, Clone, Debug, Display, From, GraphQLScalar, Into)]
#[graphql(
    name = "ProfileAddress",
    with = scalar::Via::<domain::profile::Address>,
)]
pub struct Address(domain::profile::Address);

/// Name of a residential complex.
#[derive(AsRef, Clone, Debug, Display, From, GraphQLScalar, Into)]
#[graphql(
    name = "CondoName",
    with = scalar::Via::<domain::profile::CondoName>,
)]
pub struct CondoName(domain::profile::CondoName);

/// Tax document (CPF or CNPJ) of a provider `Profile`.
#[derive(AsRef, Clone, Debug, Display, From, GraphQLScalar, Into)]
#[graphql(
    name = "ProfileDocument",
    with = scalar::Via::<domain::profile::Document>,
)]
pub struct Document(domain::profile::Document);

/// Role of a `Profile`.
#[derive(Clone, Copy, Debug, GraphQLEnum)]
#[graphql(name = "ProfileRole")]
pub enum Role {
    /// Resident of the complex, buying and booking.
    Resident,

    /// Provider selling services or products.
    Provider,
}

impl From<domain::profile::Role> for Role {
    fn from(role: domain::profile::Role) -> Self {
        use domain::profile::Role as R;
        match role {
            R::Resident => Self::Resident,
            R::Provider => Self::Provider,
        }
    }
}

/// What a provider `Profile` mainly offers.
#[derive(Clone, Copy, Debug, GraphQLEnum)]
pub enum ProviderKind {
    /// Bookable services.
    Service,

    /// Orderable products.
    Product,
}

impl From<domain::profile::ProviderKind> for ProviderKind {
    fn from(kind: domain::profile::ProviderKind) -> Self {
        use domain::profile::ProviderKind as K;
        match kind {
            K::Service => Self::Service,
            K::Product => Self::Product,
        }
    }
}

impl From<ProviderKind> for domain::profile::ProviderKind {
    fn from(kind: ProviderKind) -> Self {
        match kind {
            ProviderKind::Service => Self::Service,
            ProviderKind::Product => Self::Product,
        }
    }
}
