use serde::Deserialize;
use validator::Validate;

use crate::domain::types::UserEmail;
use crate::forms::FormError;

#[derive(Deserialize, Validate)]
/// Credentials submitted on the sign-in screen.
pub struct SignInForm {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1))]
    pub password: String,
}

/// Validated sign-in credentials.
///
/// The password is only checked for presence and is not carried further.
pub struct SignInPayload {
    pub email: UserEmail,
}

impl TryFrom<SignInForm> for SignInPayload {
    type Error = FormError;

    fn try_from(form: SignInForm) -> Result<Self, Self::Error> {
        form.validate()?;
        if form.password.trim().is_empty() {
            return Err(FormError::InvalidValue("password cannot be blank".to_string()));
        }
        let email = UserEmail::new(form.email).map_err(|_| FormError::InvalidEmail)?;
        Ok(Self { email })
    }
}
