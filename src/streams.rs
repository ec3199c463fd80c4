//----------------------------------------
// Per-patient RNG sub-streams
//----------------------------------------
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// Seed lanes per patient id. Three live streams plus one reserved lane
/// (index 3) for pre-sampled parameter pools, so pool seeds can never
/// collide with a patient stream.
const STREAM_STRIDE: u64 = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamKind {
    Trajectory = 0,
    Parameter = 1,
    Event = 2,
}

/// Derives the seed for one of a patient's sub-streams from the global seed
/// and the patient's id. Keyed by id rather than enrollment order, so a
/// patient's draws do not depend on how many other patients are simulated.
pub fn stream_seed(global_seed: u64, patient_id: u64, kind: StreamKind) -> u64 {
    global_seed
        .wrapping_add(patient_id.wrapping_mul(STREAM_STRIDE))
        .wrapping_add(kind as u64)
}

/// Seed for a pre-sampled parameter pool, on the reserved lane.
pub fn pool_seed(global_seed: u64, class_index: usize, parameter_index: usize) -> u64 {
    global_seed
        .wrapping_add((class_index as u64 * 4 + parameter_index as u64).wrapping_mul(STREAM_STRIDE))
        .wrapping_add(3)
}

/// The three independent random streams owned by one patient. Trajectory
/// assignment, parameter generation, and per-step event/noise draws each
/// consume their own stream, so extra draws in one concern never shift
/// another.
pub struct PatientStreams {
    pub trajectory: ChaCha8Rng,
    pub parameter: ChaCha8Rng,
    pub event: ChaCha8Rng,
}

impl PatientStreams {
    pub fn for_patient(global_seed: u64, patient_id: u64) -> PatientStreams {
        PatientStreams {
            trajectory: ChaCha8Rng::seed_from_u64(stream_seed(
                global_seed,
                patient_id,
                StreamKind::Trajectory,
            )),
            parameter: ChaCha8Rng::seed_from_u64(stream_seed(
                global_seed,
                patient_id,
                StreamKind::Parameter,
            )),
            event: ChaCha8Rng::seed_from_u64(stream_seed(
                global_seed,
                patient_id,
                StreamKind::Event,
            )),
        }
    }
}
