pub mod migrate;
pub mod serve;
pub mod site;
pub mod token;
pub mod user;
