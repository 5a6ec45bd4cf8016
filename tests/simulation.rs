use csmacd_rs::mac::ProtocolParams;
use csmacd_rs::utils::random::ScriptedSource;
use csmacd_rs::{NodeState, SimConfig, SimError, SimEvent, Simulation};

fn trace(seed: u64) -> (Vec<SimEvent>, Vec<Vec<NodeState>>) {
    let mut sim = Simulation::with_seed(SimConfig::default(), seed).unwrap();
    let (tx, rx) = crossbeam_channel::unbounded();
    sim.subscribe(tx);

    let mut frames = Vec::new();
    for step in 0..200 {
        if step % 3 == 0 {
            sim.inject_transmission().unwrap();
        }
        sim.tick();
        frames.push(sim.snapshot().iter().map(|n| n.state).collect());
    }
    (rx.try_iter().collect(), frames)
}

#[test]
fn seeded_runs_are_reproducible() {
    let (events_a, frames_a) = trace(42);
    let (events_b, frames_b) = trace(42);
    assert!(!events_a.is_empty());
    assert_eq!(events_a, events_b);
    assert_eq!(frames_a, frames_b);
}

#[test]
fn backoff_counters_stay_in_range() {
    let mut sim = Simulation::with_seed(SimConfig::default(), 9).unwrap();
    for step in 0..1000 {
        if step % 2 == 0 {
            sim.inject_transmission().unwrap();
        }
        sim.tick();
        for node in sim.nodes() {
            assert!(node.backoff_counter() < 10);
        }
    }
    assert!(sim.stats().collisions > 0);
    assert!(sim.stats().successes > 0);
}

#[test]
fn forced_draws_drive_the_state_machine() {
    let config = SimConfig {
        num_nodes: 1,
        ..SimConfig::default()
    };

    // r = 0.0 collides
    let rng = ScriptedSource::new(vec![0.0], vec![0, 5]);
    let mut sim = Simulation::new(config.clone(), rng).unwrap();
    sim.inject_transmission().unwrap();
    sim.tick();
    let node = &sim.nodes()[0];
    assert_eq!(node.state(), NodeState::Colliding);
    assert_eq!(node.backoff_counter(), 5);

    // r = 0.99 succeeds
    let rng = ScriptedSource::new(vec![0.99], vec![0]);
    let mut sim = Simulation::new(config, rng).unwrap();
    sim.inject_transmission().unwrap();
    sim.tick();
    assert_eq!(sim.nodes()[0].state(), NodeState::Idle);
}

#[test]
fn full_medium_makes_injection_a_no_op() {
    let mut sim = Simulation::with_seed(SimConfig::default(), 1).unwrap();
    for _ in 0..5 {
        assert!(sim.inject_transmission().unwrap().is_some());
    }
    let before = sim.snapshot();
    assert!(before.iter().all(|n| n.state == NodeState::Transmitting));

    assert_eq!(sim.inject_transmission().unwrap(), None);
    assert_eq!(sim.snapshot(), before);
    assert_eq!(sim.stats().injections_dropped, 1);
}

#[test]
fn begin_transmission_on_busy_node_is_rejected() {
    let mut node = csmacd_rs::Node::new(7);
    node.begin_transmission().unwrap();

    let err = node.begin_transmission().unwrap_err();
    assert!(matches!(
        err,
        SimError::InvalidStateTransition {
            node: 7,
            state: NodeState::Transmitting
        }
    ));
    assert_eq!(node.state(), NodeState::Transmitting);
}

#[test]
fn collision_path_draws_backoff_twice() {
    let params = ProtocolParams {
        collision_probability: 0.2,
        max_backoff: 10,
    };
    let mut node = csmacd_rs::Node::new(0);
    let mut rng = ScriptedSource::new(vec![0.1], vec![2, 6]);
    node.begin_transmission().unwrap();

    let mut events = Vec::new();
    for _ in 0..4 {
        events.extend(node.update(&params, &mut rng));
    }
    assert_eq!(
        events,
        vec![
            SimEvent::CollisionDetected { node: 0, backoff: 2 },
            SimEvent::BackoffStarted { node: 0, backoff: 6 },
        ]
    );
    assert_eq!(node.state(), NodeState::BackingOff);
    assert_eq!(node.backoff_counter(), 6);
}
