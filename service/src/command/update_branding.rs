//! [`Command`] for updating the platform [`Branding`].

use common::{
    operations::{By, Select, Update},
    DateTimeOf,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{offer::ImageUrl, profile, settings::Branding, Profile},
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for replacing the logo of the platform [`Branding`] by an
/// admin.
#[derive(Clone, Debug)]
pub struct UpdateBranding {
    /// ID of the admin [`Profile`] performing the update.
    pub initiator_id: profile::Id,

    /// New logo [`ImageUrl`], or [`None`] to remove the current one.
    pub logo_url: Option<ImageUrl>,
}

impl<Db> Command<UpdateBranding> for Service<Db>
where
    Db: Database<
            Select<By<Option<Profile>, profile::Id>>,
            Ok = Option<Profile>,
            Err = Traced<database::Error>,
        > + Database<Update<Branding>, Err = Traced<database::Error>>,
{
    type Ok = Branding;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: UpdateBranding,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let UpdateBranding {
            initiator_id,
            logo_url,
        } = cmd;

        let initiator = self
            .database()
            .execute(Select(By::<Option<Profile>, _>::new(initiator_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::ProfileNotExists(initiator_id))
            .map_err(tracerr::wrap!())?;
        if !initiator.is_admin {
            return Err(tracerr::new!(E::NotAdmin(initiator_id)));
        }

        let branding = Branding {
            logo_url,
            updated_at: Some(DateTimeOf::now()),
        };
        self.database()
            .execute(Update(branding.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        Ok(branding)
    }
}

/// Error of [`UpdateBranding`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    Db(database::Error),

    /// [`Profile`] is not an admin.
    #[display("`Profile(id: {_0})` is not an admin")]
    #[from(ignore)]
    NotAdmin(#[error(not(source))] profile::Id),

    /// [`Profile`] with the provided ID does not exist.
    #[display("`Profile(id: {_0})` does not exist")]
    #[from(ignore)]
    ProfileNotExists(#[error(not(source))] profile::Id),
}

#[cfg(test)]
mod spec {
    use common::operations::{By, Insert, Select};

    use crate::{
        domain::{profile::Role, settings::Branding},
        test_support::{profile, service},
        Command as _,
    };

    use super::{ExecutionError, UpdateBranding};

    #[tokio::test]
    async fn admin_replaces_logo() {
        let svc = service();
        let mut admin = profile(Role::Resident);
        admin.is_admin = true;
        svc.database().execute(Insert(admin.clone())).await.unwrap();

        let branding = svc
            .execute(UpdateBranding {
                initiator_id: admin.id,
                logo_url: Some("https://cdn.example.com/logo.png".parse().unwrap()),
            })
            .await
            .unwrap();
        assert!(branding.updated_at.is_some());

        let stored = svc
            .database()
            .execute(Select(By::<Option<Branding>, _>::new(())))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.logo_url, branding.logo_url);
    }

    #[tokio::test]
    async fn rejects_non_admins() {
        let svc = service();
        let provider = profile(Role::Provider);
        svc.database().execute(Insert(provider.clone())).await.unwrap();

        let err = svc
            .execute(UpdateBranding {
                initiator_id: provider.id,
                logo_url: None,
            })
            .await
            .unwrap_err();
        assert!(matches!(err.into_inner(), ExecutionError::NotAdmin(_)));
    }
}
