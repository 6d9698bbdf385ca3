pub mod init;
pub mod login;
pub mod logout;
pub mod post;
pub mod whoami;

pub use init::Init;
pub use login::Login;
pub use logout::Logout;
pub use post::Post;
pub use whoami::Whoami;
