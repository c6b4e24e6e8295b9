use admissions_domain::phone::PhonePlan;

use crate::domain::repository::UserRepository;
use crate::domain::types::User;
use crate::error::PortalError;

pub struct LookupUserByPhoneUseCase<U: UserRepository> {
    pub users: U,
    pub phone_plan: PhonePlan,
}

impl<U: UserRepository> LookupUserByPhoneUseCase<U> {
    /// Resolve a verified user from raw phone input.
    pub async fn execute(&self, phone_number: &str) -> Result<User, PortalError> {
        if phone_number.trim().is_empty() {
            return Err(PortalError::MissingData("phoneNumber is required".to_owned()));
        }
        let phone = self.phone_plan.normalize(phone_number)?;
        let user = self
            .users
            .find_by_phone(&phone)
            .await?
            .ok_or(PortalError::UserNotFound)?;
        if !user.is_verified {
            return Err(PortalError::UserNotVerified);
        }
        Ok(user)
    }
}
