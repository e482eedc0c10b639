//! [`Command`] for authorizing a [`Session`].

use common::operations::{By, Select};
use derive_more::{Display, Error, From};
use jsonwebtoken::{Algorithm, Validation};
use tracerr::Traced;

use crate::{
    domain::{
        profile,
        session::{self, Session},
        Profile,
    },
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for authorizing a [`Session`] by its access token issued by
/// the identity provider.
#[derive(Clone, Debug, From)]
pub struct AuthorizeSession {
    /// [`session::Token`] to authorize.
    pub token: session::Token,
}

impl<Db> Command<AuthorizeSession> for Service<Db>
where
    Db: Database<
        Select<By<Option<Profile>, profile::Id>>,
        Ok = Option<Profile>,
        Err = Traced<database::Error>,
    >,
{
    type Ok = (Session, Profile);
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: AuthorizeSession,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let AuthorizeSession { token } = cmd;

        let mut validation = Validation::new(Algorithm::HS256);
        if let Some(aud) = &self.config().jwt_audience {
            validation.set_audience(&[aud]);
        } else {
            validation.validate_aud = false;
        }

        let session = jsonwebtoken::decode::<Session>(
            token.as_ref(),
            &self.config().jwt_decoding_key,
            &validation,
        )
        .map_err(tracerr::from_and_wrap!(=> E))?
        .claims;

        let profile = self
            .database()
            .execute(Select(By::new(session.profile_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::ProfileNotExists(session.profile_id))
            .map_err(tracerr::wrap!())?;

        Ok((session, profile))
    }
}

/// Error of [`AuthorizeSession`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    Db(database::Error),

    /// [`jsonwebtoken`] decoding error.
    #[display("Failed to decode a JSON Web Token: {_0}")]
    JsonWebTokenDecodeError(jsonwebtoken::errors::Error),

    /// [`Profile`] the [`Session`] belongs to does not exist.
    #[display("`Profile(id: {_0})` does not exist")]
    #[from(ignore)]
    ProfileNotExists(#[error(not(source))] profile::Id),
}

#[cfg(test)]
mod spec {
    use std::time::Duration;

    use common::{operations::Insert, DateTime};
    use jsonwebtoken::{EncodingKey, Header};

    use crate::{
        domain::{
            profile::{self, Role},
            Session,
        },
        test_support::{self, service, SECRET},
        Command as _,
    };

    use super::{AuthorizeSession, ExecutionError};

    fn token(session: &Session) -> String {
        jsonwebtoken::encode(
            &Header::default(),
            session,
            &EncodingKey::from_secret(SECRET),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn authorizes_known_profile() {
        let svc = service();
        let resident = test_support::profile(Role::Resident);
        svc.database().execute(Insert(resident.clone())).await.unwrap();
        let session = Session {
            profile_id: resident.id,
            expires_at: (DateTime::now() + Duration::from_secs(3600)).coerce(),
        };

        let (authorized, p) = svc
            .execute(AuthorizeSession {
                token: token(&session).parse().unwrap(),
            })
            .await
            .unwrap();

        assert_eq!(authorized.profile_id, resident.id);
        assert_eq!(p.id, resident.id);
    }

    #[tokio::test]
    async fn rejects_unknown_profile() {
        let svc = service();
        let session = Session {
            profile_id: profile::Id::new(),
            expires_at: (DateTime::now() + Duration::from_secs(3600)).coerce(),
        };

        let err = svc
            .execute(AuthorizeSession {
                token: token(&session).parse().unwrap(),
            })
            .await
            .unwrap_err();

        assert!(matches!(
            err.into_inner(),
            ExecutionError::ProfileNotExists(id) if id == session.profile_id,
        ));
    }

    #[tokio::test]
    async fn rejects_expired_and_forged_tokens() {
        let svc = service();
        let resident = test_support::profile(Role::Resident);
        svc.database().execute(Insert(resident.clone())).await.unwrap();

        let expired = Session {
            profile_id: resident.id,
            expires_at: DateTime::from_unix_timestamp(1_000_000)
                .unwrap()
                .coerce(),
        };
        let err = svc
            .execute(AuthorizeSession {
                token: token(&expired).parse().unwrap(),
            })
            .await
            .unwrap_err();
        assert!(matches!(
            err.into_inner(),
            ExecutionError::JsonWebTokenDecodeError(_),
        ));

        let err = svc
            .execute(AuthorizeSession {
                token: "not.a.token".parse().unwrap(),
            })
            .await
            .unwrap_err();
        assert!(matches!(
            err.into_inner(),
            ExecutionError::JsonWebTokenDecodeError(_),
        ));
    }
}
