//! [`Command`] for updating the details of a [`Profile`].

use common::operations::{By, Select, Update};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{
        offer::product::Category,
        profile::{
            self, Address, CondoName, Document, Name, Phone, ProviderKind,
        },
        Profile,
    },
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for updating the details of a [`Profile`] by its owner.
///
/// [`None`] fields are left untouched.
#[derive(Clone, Debug)]
pub struct UpdateProfile {
    /// ID of the [`Profile`] updating itself.
    pub profile_id: profile::Id,

    /// New full [`Name`].
    pub name: Option<Name>,

    /// New contact [`Phone`].
    pub phone: Option<Phone>,

    /// New [`Address`] inside the residential complex.
    pub address: Option<Address>,

    /// New [`CondoName`] of the residential complex.
    pub condo_name: Option<CondoName>,

    /// New [`ProviderDetails`], allowed for providers only.
    pub provider: Option<ProviderDetails>,
}

/// Details of a provider [`Profile`], replaced as a whole.
#[derive(Clone, Debug)]
pub struct ProviderDetails {
    /// What the provider mainly offers.
    pub kind: ProviderKind,

    /// Tax [`Document`] of the provider.
    pub document: Option<Document>,

    /// [`Category`]s the provider works in.
    pub categories: Vec<Category>,
}

impl<Db> Command<UpdateProfile> for Service<Db>
where
    Db: Database<
            Select<By<Option<Profile>, profile::Id>>,
            Ok = Option<Profile>,
            Err = Traced<database::Error>,
        > + Database<Update<Profile>, Err = Traced<database::Error>>,
{
    type Ok = Profile;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: UpdateProfile,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let UpdateProfile {
            profile_id,
            name,
            phone,
            address,
            condo_name,
            provider,
        } = cmd;

        let mut profile = self
            .database()
            .execute(Select(By::<Option<Profile>, _>::new(profile_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::ProfileNotExists(profile_id))
            .map_err(tracerr::wrap!())?;

        if let Some(details) = provider {
            if !profile.is_provider() {
                return Err(tracerr::new!(E::NotProvider(profile_id)));
            }
            let ProviderDetails {
                kind,
                document,
                categories,
            } = details;
            profile.provider_kind = Some(kind);
            profile.document = document;
            profile.categories = categories;
        }
        if let Some(name) = name {
            profile.name = name;
        }
        if let Some(phone) = phone {
            profile.phone = Some(phone);
        }
        if let Some(address) = address {
            profile.address = Some(address);
        }
        if let Some(condo_name) = condo_name {
            profile.condo_name = Some(condo_name);
        }

        self.database()
            .execute(Update(profile.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        Ok(profile)
    }
}

/// Error of [`UpdateProfile`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    Db(database::Error),

    /// [`Profile`] is not a provider.
    #[display("`Profile(id: {_0})` is not a provider")]
    #[from(ignore)]
    NotProvider(#[error(not(source))] profile::Id),

    /// [`Profile`] with the provided ID does not exist.
    #[display("`Profile(id: {_0})` does not exist")]
    #[from(ignore)]
    ProfileNotExists(#[error(not(source))] profile::Id),
}

#[cfg(test)]
mod spec {
    use common::operations::{By, Insert, Select};

    use crate::{
        domain::{
            profile::{self, ProviderKind, Role},
            Profile,
        },
        test_support::{self, service},
        Command as _,
    };

    use super::{ExecutionError, ProviderDetails, UpdateProfile};

    fn update(profile_id: profile::Id) -> UpdateProfile {
        UpdateProfile {
            profile_id,
            name: None,
            phone: None,
            address: None,
            condo_name: None,
            provider: None,
        }
    }

    #[tokio::test]
    async fn resident_completes_basic_details() {
        let svc = service();
        let resident = test_support::profile(Role::Resident);
        svc.database().execute(Insert(resident.clone())).await.unwrap();

        let updated = svc
            .execute(UpdateProfile {
                phone: Some("(21) 97777-6666".parse().unwrap()),
                condo_name: Some("Residencial Jardins".parse().unwrap()),
                ..update(resident.id)
            })
            .await
            .unwrap();
        assert_eq!(updated.name, resident.name);
        assert_eq!(updated.address, resident.address);
        assert_eq!(updated.phone, Some("(21) 97777-6666".parse().unwrap()));

        let stored = svc
            .database()
            .execute(Select(By::<Option<Profile>, _>::new(resident.id)))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.phone, updated.phone);
        assert_eq!(
            stored.condo_name,
            Some("Residencial Jardins".parse().unwrap()),
        );
        assert_eq!(stored.role, Role::Resident);
    }

    #[tokio::test]
    async fn provider_replaces_provider_details() {
        let svc = service();
        let provider = test_support::profile(Role::Provider);
        svc.database().execute(Insert(provider.clone())).await.unwrap();

        let updated = svc
            .execute(UpdateProfile {
                provider: Some(ProviderDetails {
                    kind: ProviderKind::Product,
                    document: Some("12.345.678/0001-95".parse().unwrap()),
                    categories: vec!["Doces".parse().unwrap()],
                }),
                ..update(provider.id)
            })
            .await
            .unwrap();
        assert_eq!(updated.provider_kind, Some(ProviderKind::Product));
        assert!(updated.document.as_ref().is_some_and(|d| d.is_company()));
        assert_eq!(updated.categories, vec!["Doces".parse().unwrap()]);

        let stored = svc
            .database()
            .execute(Select(By::<Option<Profile>, _>::new(provider.id)))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.provider_kind, Some(ProviderKind::Product));
        assert_eq!(stored.categories, updated.categories);
    }

    #[tokio::test]
    async fn rejects_provider_details_of_residents() {
        let svc = service();
        let resident = test_support::profile(Role::Resident);
        svc.database().execute(Insert(resident.clone())).await.unwrap();

        let err = svc
            .execute(UpdateProfile {
                name: Some("Outro Nome".parse().unwrap()),
                provider: Some(ProviderDetails {
                    kind: ProviderKind::Service,
                    document: None,
                    categories: vec![],
                }),
                ..update(resident.id)
            })
            .await
            .unwrap_err();
        assert!(matches!(err.into_inner(), ExecutionError::NotProvider(_)));

        let stored = svc
            .database()
            .execute(Select(By::<Option<Profile>, _>::new(resident.id)))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.name, resident.name);
        assert_eq!(stored.provider_kind, None);
    }

    #[tokio::test]
    async fn rejects_unknown_profiles() {
        let svc = service();

        let err = svc
            .execute(update(profile::Id::new()))
            .await
            .unwrap_err();
        assert!(matches!(
            err.into_inner(),
            ExecutionError::ProfileNotExists(_),
        ));
    }
}
