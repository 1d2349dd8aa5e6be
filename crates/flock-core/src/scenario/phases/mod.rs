mod cache;
mod constraints;
mod forces;
mod integration;
