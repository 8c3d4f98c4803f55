pub mod anchor_server;
