pub mod alchemy;
pub mod http;
pub mod neynar;
pub mod price;
pub mod rpc;
