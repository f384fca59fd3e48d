//! Ports - Interfaces between the application and external collaborators

pub mod outbound;
