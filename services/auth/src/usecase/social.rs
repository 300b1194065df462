use smarttech_domain::clock::Clock;
use smarttech_domain::user::{AuthProvider, UserRole, UserStatus};

use crate::domain::repository::{TokenBlacklist, UserRepository};
use crate::domain::types::{NewUser, SocialProfile, UserRecord};
use crate::error::AuthServiceError;
use crate::usecase::session::LoginOutput;
use crate::usecase::token::{CreateTokenPayload, TokenService};

pub struct SocialLoginInput {
    pub provider: AuthProvider,
    pub profile: SocialProfile,
}

/// Login-or-create for provider-verified identities. No OTP: the provider already
/// proved control of the email.
pub struct SocialLoginUseCase<U, B, C>
where
    U: UserRepository,
    B: TokenBlacklist,
    C: Clock,
{
    pub users: U,
    pub tokens: TokenService<B, C>,
}

impl<U, B, C> SocialLoginUseCase<U, B, C>
where
    U: UserRepository,
    B: TokenBlacklist,
    C: Clock,
{
    pub async fn execute(&self, input: SocialLoginInput) -> Result<LoginOutput, AuthServiceError> {
        let email = input
            .profile
            .email
            .filter(|e| !e.is_empty())
            .ok_or_else(|| {
                AuthServiceError::Validation(format!(
                    "{} account has no email address",
                    input.provider.as_str().to_lowercase()
                ))
            })?;

        let user = self
            .find_or_create(&email, input.provider, input.profile.name, input.profile.avatar)
            .await?;

        let tokens = self.tokens.create_token_pairs(CreateTokenPayload {
            sub: user.id,
            role: user.role,
        })?;

        tracing::info!(user_id = %user.id, provider = input.provider.as_str(), "social login");
        Ok(LoginOutput { user, tokens })
    }

    async fn find_or_create(
        &self,
        email: &str,
        provider: AuthProvider,
        name: Option<String>,
        avatar: Option<String>,
    ) -> Result<UserRecord, AuthServiceError> {
        match self.users.find_by_email(email).await? {
            Some(user) => match user.status {
                UserStatus::Active => Ok(user),
                UserStatus::Disabled => Err(AuthServiceError::Unauthorized),
                UserStatus::Pending => {
                    self.users.activate(user.id).await?;
                    Ok(UserRecord {
                        status: UserStatus::Active,
                        ..user
                    })
                }
            },
            None => {
                let user = self
                    .users
                    .create(&NewUser {
                        email: email.to_owned(),
                        status: UserStatus::Active,
                        role: UserRole::User,
                        provider,
                        name,
                        avatar,
                    })
                    .await?;
                tracing::info!(user_id = %user.id, provider = provider.as_str(), "user created");
                Ok(user)
            }
        }
    }
}
