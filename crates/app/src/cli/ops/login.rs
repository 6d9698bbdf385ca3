use std::io::{BufRead, Write};

use clap::Args;

use common::prelude::{Credential, SessionError};

use crate::cli::op::OpContextError;

#[derive(Args, Debug, Clone)]
pub struct Login {
    /// Personal access token; prompted for when omitted
    #[arg(long)]
    pub token: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum LoginError {
    #[error(transparent)]
    Context(#[from] OpContextError),
    #[error(transparent)]
    Session(#[from] SessionError),
    #[error("Failed to read token: {0}")]
    Io(#[from] std::io::Error),
    #[error("No token provided")]
    EmptyToken,
}

fn prompt_token() -> Result<String, LoginError> {
    eprint!("Token: ");
    std::io::stderr().flush()?;
    let mut line = String::new();
    std::io::stdin().lock().read_line(&mut line)?;
    let token = line.trim().to_string();
    if token.is_empty() {
        return Err(LoginError::EmptyToken);
    }
    Ok(token)
}

#[async_trait::async_trait]
impl crate::cli::op::Op for Login {
    type Error = LoginError;
    type Output = String;

    async fn execute(&self, ctx: &crate::cli::op::OpContext) -> Result<Self::Output, Self::Error> {
        let token = match &self.token {
            Some(token) if !token.trim().is_empty() => token.trim().to_string(),
            Some(_) => return Err(LoginError::EmptyToken),
            None => prompt_token()?,
        };

        let session = ctx.session()?;
        let identity = session.login(Credential::new(token)).await?;
        Ok(format!("Logged in as {}", identity))
    }
}
