use anyhow::Result;
use tdrl_core::{
    record::{BufferedRecorder, Recorder},
    Env, Learner, Policy, Step, Transition,
};
use tdrl_tile_agent::{
    algorithm::{shared, DynaQ, DynaQConfig, GradientDescentConfig, QLearning, SharedTileCode},
    coding::{CollisionFree, DimensionInfo, TileCode, TileCodeConfig},
    explorer::EpsilonGreedy,
};

const N_STATES: usize = 5;
const START: usize = 2;
const MAX_STEPS: usize = 100;
const LEFT: f32 = 0.0;
const RIGHT: f32 = 1.0;

/// Corridor `0, ..., N_STATES - 1` starting in the middle. Reaching the
/// right end gives reward 1 and ends the episode. Moving left at 0 stays.
struct Corridor {
    pos: usize,
}

impl Corridor {
    fn new() -> Self {
        Self { pos: START }
    }
}

impl Env for Corridor {
    type State = Vec<f32>;
    type Action = Vec<f32>;

    fn reset(&mut self) -> Result<Vec<f32>> {
        self.pos = START;
        Ok(vec![self.pos as f32])
    }

    fn step(&mut self, a: &Vec<f32>) -> Result<Step<Vec<f32>>> {
        if a[0] == RIGHT {
            self.pos += 1;
        } else {
            self.pos = self.pos.saturating_sub(1);
        }
        let is_terminal = self.pos == N_STATES - 1;
        let reward = if is_terminal { 1.0 } else { 0.0 };
        Ok(Step::new(vec![self.pos as f32], reward, is_terminal))
    }

    fn actions(&self) -> Vec<Vec<f32>> {
        vec![vec![LEFT], vec![RIGHT]]
    }
}

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// One cell per state and action.
fn create_tile_code() -> Result<SharedTileCode<CollisionFree>> {
    let config = TileCodeConfig::default()
        .dimension(DimensionInfo::new(0.0, (N_STATES - 1) as f32, N_STATES - 1)?)
        .dimension(DimensionInfo::new(LEFT, RIGHT, 1)?)
        .num_tilings(1)
        .seed(0);
    Ok(shared(TileCode::collision_free(&config)?))
}

fn run_episode<E, L, P>(
    env: &mut E,
    learner: &mut L,
    policy: &mut P,
    recorder: &mut impl Recorder,
) -> Result<usize>
where
    E: Env<State = Vec<f32>, Action = Vec<f32>>,
    L: Learner<Vec<f32>, Vec<f32>>,
    P: Policy<Vec<f32>>,
{
    let actions = env.actions();
    learner.begin_episode();
    let mut state = env.reset()?;
    let mut action = policy.select_action(&actions, &mut |a| learner.value(&state, a))?;

    for n in 1..=MAX_STEPS {
        let Step {
            next_state,
            reward,
            is_terminal,
        } = env.step(&action)?;
        let next_action = if is_terminal {
            action.clone()
        } else {
            policy.select_action(&actions, &mut |a| learner.value(&next_state, a))?
        };

        let t = Transition::new(state, action, reward, next_state.clone(), next_action.clone())
            .terminal(is_terminal);
        recorder.write(learner.learn(&t)?);

        if is_terminal {
            return Ok(n);
        }
        state = next_state;
        action = next_action;
    }
    Ok(MAX_STEPS)
}

/// Returns the number of steps the greedy policy needs, `MAX_STEPS` if it
/// never reaches the goal.
fn greedy_steps<L: Learner<Vec<f32>, Vec<f32>>>(learner: &L) -> Result<usize> {
    let mut env = Corridor::new();
    let mut greedy = EpsilonGreedy::constant(0.0, 0);
    let actions = env.actions();
    let mut state = env.reset()?;

    for n in 1..=MAX_STEPS {
        let action =
            greedy.select_action(&actions, &mut |a: &Vec<f32>| learner.value(&state, a))?;
        let step = env.step(&action)?;
        if step.is_terminal {
            return Ok(n);
        }
        state = step.next_state;
    }
    Ok(MAX_STEPS)
}

#[test]
fn test_dyna_q_random_walk() -> Result<()> {
    init_logger();

    let config = DynaQConfig::default()
        .learner(
            GradientDescentConfig::default()
                .step_size(0.5)
                .discount_rate(0.9)
                .lambda(0.5),
        )
        .simulation_iteration_count(30)
        .state_transition_greediness(1.0)
        .state_transition_step_size(1.0)
        .seed(0);
    let mut env = Corridor::new();
    let mut dyna_q = DynaQ::build(create_tile_code()?, config, 1, env.actions())?;
    let mut behavior = EpsilonGreedy::constant(1.0, 7);
    let mut recorder = BufferedRecorder::new();

    for _ in 0..20 {
        run_episode(&mut env, &mut dyna_q, &mut behavior, &mut recorder)?;
    }

    assert!(recorder.scalars("planning_steps").iter().all(|&n| n == 30.0));
    assert_eq!(recorder.scalars("td_error").len(), recorder.len());
    let last = (N_STATES - 1) as f32;
    assert!(dyna_q.is_terminal(&[last - 1.0], &[RIGHT], &[last]));
    assert_eq!(greedy_steps(&dyna_q)?, N_STATES - 1 - START);
    assert_eq!(dyna_q.greedy_action(&[START as f32])?, vec![RIGHT]);

    Ok(())
}

#[test]
fn test_q_learning_random_walk() -> Result<()> {
    init_logger();

    let config = GradientDescentConfig::default()
        .step_size(0.5)
        .discount_rate(0.9)
        .lambda(0.0);
    let mut env = Corridor::new();
    let mut q = QLearning::build(create_tile_code()?, config, 1, env.actions())?;
    let mut behavior = EpsilonGreedy::constant(1.0, 11);
    let mut recorder = BufferedRecorder::new();

    for _ in 0..50 {
        run_episode(&mut env, &mut q, &mut behavior, &mut recorder)?;
    }

    assert_eq!(greedy_steps(&q)?, N_STATES - 1 - START);

    // Values never exceed the discounted reward of the shortest path.
    for s in 0..N_STATES - 1 {
        let v = q.value(&vec![s as f32], &vec![RIGHT])?;
        let bound = 0.9f32.powi((N_STATES - 2 - s) as i32);
        assert!(v <= bound + 1e-5, "Q({}, right) = {} > {}", s, v, bound);
    }

    Ok(())
}
