//! Property-based tests for trigger resolution and cascading.
//!
//! These tests use proptest to verify properties hold across
//! many randomly generated machine configurations.

use proptest::prelude::*;
use stateline::builder::{simple_transition, TransitionBuilder};
use stateline::core::State;
use stateline::options::{CascadeLimitStrategy, OptionsBuilder};
use stateline::{state_enum, StateMachine, TransitionResult};
use tokio_util::sync::CancellationToken;

state_enum! {
    enum Stage {
        S0,
        S1,
        S2,
        S3,
        S4,
    }
}

const STAGES: [Stage; 5] = [Stage::S0, Stage::S1, Stage::S2, Stage::S3, Stage::S4];

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
enum Signal {
    Go,
    Halt,
}

struct Job {
    stage: Stage,
}

type JobMachine = StateMachine<Job, Stage, Signal>;

fn machine() -> JobMachine {
    StateMachine::new(|job: &Job| job.stage, |job: &mut Job, stage| job.stage = stage)
}

fn fire(machine: &JobMachine, job: &mut Job, signal: Signal) -> TransitionResult<Stage, Signal> {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap()
        .block_on(machine.fire_trigger(job, signal, &CancellationToken::new()))
        .unwrap()
}

prop_compose! {
    fn arbitrary_stage()(index in 0..5usize) -> Stage {
        STAGES[index]
    }
}

proptest! {
    #[test]
    fn unmatched_trigger_never_moves(start in arbitrary_stage(), target in arbitrary_stage()) {
        let mut machine = machine();
        machine
            .configure_state(start)
            .add_transition(Signal::Go, simple_transition(target));
        let mut job = Job { stage: start };

        let result = fire(&machine, &mut job, Signal::Halt);

        prop_assert!(!result.was_successful());
        prop_assert_eq!(job.stage, start);
        prop_assert_eq!(result.starting_state(), &start);
        prop_assert_eq!(result.current_state(), &start);
        prop_assert_eq!(result.previous_state(), &start);
    }

    #[test]
    fn highest_priority_then_first_registered_wins(
        priorities in prop::collection::vec(0..4u32, 1..8)
    ) {
        let mut machine = machine();
        {
            let mut start = machine.configure_state(Stage::S0);
            for (index, priority) in priorities.iter().enumerate() {
                start
                    .transition(
                        Signal::Go,
                        TransitionBuilder::new()
                            .to(Stage::S1)
                            .named(index.to_string())
                            .priority(*priority),
                    )
                    .unwrap();
            }
        }
        let mut job = Job { stage: Stage::S0 };

        let result = fire(&machine, &mut job, Signal::Go);

        let top = priorities.iter().max().copied().unwrap_or_default();
        let expected = priorities.iter().position(|p| *p == top).unwrap_or_default();
        prop_assert_eq!(result.last_transition_name(), expected.to_string());
    }

    #[test]
    fn automatic_chain_reaches_its_end(length in 1..5usize) {
        let mut machine = machine();
        machine
            .configure_state(Stage::S0)
            .add_transition(Signal::Go, simple_transition(Stage::S1));
        for window in STAGES[1..=length].windows(2) {
            machine
                .configure_state(window[0])
                .add_auto_forward_transition(simple_transition(window[1]), None)
                .unwrap();
        }
        let mut job = Job { stage: Stage::S0 };

        let result = fire(&machine, &mut job, Signal::Go);

        prop_assert_eq!(job.stage, STAGES[length]);
        prop_assert_eq!(result.starting_state(), &Stage::S0);
        prop_assert_eq!(result.history().len(), length);
        let path: Vec<Stage> = result.history().get_path().into_iter().copied().collect();
        prop_assert_eq!(path, STAGES[..=length].to_vec());
    }

    #[test]
    fn cascade_limit_caps_cyclic_chains(limit in 0..10usize) {
        let mut machine = machine().with_options(
            OptionsBuilder::new()
                .max_cascade_steps(limit)
                .on_cascade_limit(CascadeLimitStrategy::Stop)
                .build(),
        );
        machine
            .configure_state(Stage::S0)
            .add_transition(Signal::Go, simple_transition(Stage::S1))
            .add_auto_forward_transition(simple_transition(Stage::S1), None)
            .unwrap();
        machine
            .configure_state(Stage::S1)
            .add_auto_forward_transition(simple_transition(Stage::S0), None)
            .unwrap();
        let mut job = Job { stage: Stage::S0 };

        let result = fire(&machine, &mut job, Signal::Go);

        prop_assert!(result.was_successful());
        prop_assert_eq!(result.history().len(), limit + 1);
        prop_assert_eq!(&job.stage, result.current_state());
    }

    #[test]
    fn membership_follows_super_state_chain(depth in 0..5usize, candidate in arbitrary_stage()) {
        let mut machine = machine();
        for window in STAGES[..=depth].windows(2) {
            machine
                .configure_state(window[0])
                .add_super_state(window[1])
                .unwrap();
        }
        let job = Job { stage: Stage::S0 };

        let expected = STAGES[..=depth].contains(&candidate);
        prop_assert_eq!(machine.is_in_state(&job, &candidate), expected);
    }

    #[test]
    fn state_name_is_stable(stage in arbitrary_stage()) {
        prop_assert_eq!(stage.name(), format!("{:?}", stage));
    }
}
