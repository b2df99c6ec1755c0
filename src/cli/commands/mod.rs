pub mod init;
pub mod make_pot;

pub use init::init;
pub use make_pot::make_pot;
