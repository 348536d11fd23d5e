pub mod analytics;
pub mod car;
pub mod coast_fire;
pub mod fi;
pub mod health;
pub mod life_event;
pub mod loan;
pub mod mortgage;
pub mod retirement;
