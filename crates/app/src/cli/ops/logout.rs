use clap::Args;

use common::prelude::SessionError;

use crate::cli::op::OpContextError;

#[derive(Args, Debug, Clone)]
pub struct Logout;

#[derive(Debug, thiserror::Error)]
pub enum LogoutError {
    #[error(transparent)]
    Context(#[from] OpContextError),
    #[error(transparent)]
    Session(#[from] SessionError),
}

#[async_trait::async_trait]
impl crate::cli::op::Op for Logout {
    type Error = LogoutError;
    type Output = String;

    async fn execute(&self, ctx: &crate::cli::op::OpContext) -> Result<Self::Output, Self::Error> {
        let session = ctx.session()?;
        session.logout()?;
        Ok("Logged out".to_string())
    }
}
