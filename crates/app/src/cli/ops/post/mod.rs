use clap::{Args, Subcommand};

pub mod cat;
pub mod ls;
pub mod new;
pub mod publish;

use crate::cli::op::Op;

crate::command_enum! {
    (Ls, ls::Ls),
    (Cat, cat::Cat),
    (New, new::New),
    (Publish, publish::Publish),
}

// Rename the generated Command to PostCommand for clarity
pub type PostCommand = Command;

#[derive(Args, Debug, Clone)]
pub struct Post {
    #[command(subcommand)]
    pub command: PostCommand,
}

#[async_trait::async_trait]
impl Op for Post {
    type Error = OpError;
    type Output = OpOutput;

    async fn execute(&self, ctx: &crate::cli::op::OpContext) -> Result<Self::Output, Self::Error> {
        self.command.execute(ctx).await
    }
}
