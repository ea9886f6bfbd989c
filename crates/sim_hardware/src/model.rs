/// Step size for one simulation step
#[derive(Debug, Clone, Copy)]
pub struct SimContext {
    pub dt: f64,
}

pub trait Model {
    fn reset(&mut self);
}

pub trait PlantModel: Model {
    fn step(&mut self, ctx: SimContext);
}
