//! Guardian Battles - energy-fuelled card battles and their XP rewards

pub mod battle;
pub mod core;
