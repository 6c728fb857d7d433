use chrono::{DateTime, Utc};
use serde::Serialize;
use simbot_engine::RobotState;

#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub ran_at: DateTime<Utc>,
    pub controller: String,
    pub iterations: usize,
    pub eaten: usize,
    pub robots: Vec<RobotReport>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RobotReport {
    pub id: usize,
    pub x: f64,
    pub y: f64,
    pub direction: f64,
    pub eat_count: usize,
    pub collision_count: usize,
    pub fitness: i64,
}

impl RobotReport {
    pub fn new(id: usize, robot: &RobotState, fitness: i64) -> Self {
        let pos = robot.pos();
        Self {
            id,
            x: pos.x,
            y: pos.y,
            direction: robot.direction(),
            eat_count: robot.eat_count(),
            collision_count: robot.collision_count(),
            fitness,
        }
    }
}
