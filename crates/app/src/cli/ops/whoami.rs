use clap::Args;

use common::prelude::SessionError;

use crate::cli::op::OpContextError;

#[derive(Args, Debug, Clone)]
pub struct Whoami;

#[derive(Debug, thiserror::Error)]
pub enum WhoamiError {
    #[error(transparent)]
    Context(#[from] OpContextError),
    #[error(transparent)]
    Session(#[from] SessionError),
}

#[async_trait::async_trait]
impl crate::cli::op::Op for Whoami {
    type Error = WhoamiError;
    type Output = String;

    async fn execute(&self, ctx: &crate::cli::op::OpContext) -> Result<Self::Output, Self::Error> {
        let session = ctx.session()?;
        let identity = session.authenticate().await?;
        Ok(identity)
    }
}
