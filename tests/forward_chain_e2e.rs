use kyrorule::{
    closure, newly_derived, run, EventLog, Fact, FactSet, FiringEvent, InferenceEngine,
    KnowledgeBase, NoopObserver, Rule, RuleBase,
};

fn facts(ids: &[&str]) -> Vec<Fact> {
    ids.iter().map(|id| Fact::new(*id).unwrap()).collect()
}

fn set(ids: &[&str]) -> FactSet {
    facts(ids).into_iter().collect()
}

fn flu_rules() -> RuleBase {
    RuleBase::new(vec![
        Rule::new(["fever", "cough"], "possible_flu").unwrap(),
        Rule::new(["body_aches", "possible_flu"], "diagnose_flu").unwrap(),
    ])
}

fn conclusions(log: &EventLog) -> Vec<String> {
    log.firings().map(|e| e.conclusion.to_string()).collect()
}

#[test]
fn scenario_a_flu_diagnosis() {
    let mut log = EventLog::new();
    let out = run(&flu_rules(), facts(&["fever", "cough", "body_aches"]), &mut log);

    assert_eq!(out, set(&["fever", "cough", "body_aches", "possible_flu", "diagnose_flu"]));
    assert_eq!(conclusions(&log), vec!["possible_flu", "diagnose_flu"]);
    assert_eq!(
        log.messages(),
        vec![
            "Rule fired: IF ['fever', 'cough'] THEN possible_flu".to_string(),
            "Rule fired: IF ['body_aches', 'possible_flu'] THEN diagnose_flu".to_string(),
        ]
    );
}

#[test]
fn scenario_b_no_match() {
    let mut log = EventLog::new();
    let out = run(&flu_rules(), facts(&["fever"]), &mut log);

    assert_eq!(out, set(&["fever"]));
    assert!(log.is_empty());
}

#[test]
fn scenario_c_chaining_within_one_pass() {
    let rules = RuleBase::new(vec![
        Rule::new(["a"], "b").unwrap(),
        Rule::new(["b"], "c").unwrap(),
    ]);
    let mut kb = KnowledgeBase::with_rules(rules);
    kb.add_facts(facts(&["a"]));

    let report = InferenceEngine::new().forward_chain(&mut kb, &mut NoopObserver);

    assert_eq!(kb.facts().snapshot(), set(&["a", "b", "c"]));
    let passes: Vec<usize> = report.firings.iter().map(|e| e.pass).collect();
    assert_eq!(passes, vec![1, 1]);
}

#[test]
fn scenario_d_reset_empties_facts() {
    let mut kb = KnowledgeBase::with_rules(flu_rules());
    kb.add_facts(facts(&["fever", "cough"]));
    InferenceEngine::new().forward_chain(&mut kb, &mut NoopObserver);
    assert!(!kb.facts().is_empty());

    kb.reset_facts();
    assert!(kb.facts().is_empty());
    assert_eq!(kb.facts().snapshot(), FactSet::default());
}

#[test]
fn final_facts_contain_initial_facts() {
    let initial = set(&["fever", "cough", "sore_throat"]);
    let out = closure(&flu_rules(), initial.iter().cloned());
    assert!(initial.is_subset(&out));
    assert_eq!(newly_derived(&initial, &out), set(&["possible_flu"]));
}

#[test]
fn second_run_is_a_no_op() {
    let rules = flu_rules();
    let first = closure(&rules, facts(&["fever", "cough", "body_aches"]));

    let mut log = EventLog::new();
    let second = run(&rules, first.iter().cloned(), &mut log);
    assert_eq!(first, second);
    assert!(log.is_empty());
}

#[test]
fn repeated_runs_are_identical() {
    let rules = kyrorule::medical_rules(kyrorule::Domain::Both).unwrap();
    let initial = facts(&[
        "loss_of_taste",
        "fever",
        "cough",
        "chest_pain",
        "shortness_of_breath",
        "diaphoresis",
        "nausea",
    ]);

    let mut first_log: Vec<FiringEvent> = Vec::new();
    let first = run(&rules, initial.clone(), &mut |e: &FiringEvent| first_log.push(e.clone()));

    for _ in 0..5 {
        let mut log: Vec<FiringEvent> = Vec::new();
        let out = run(&rules, initial.clone(), &mut |e: &FiringEvent| log.push(e.clone()));
        assert_eq!(out.iter().collect::<Vec<_>>(), first.iter().collect::<Vec<_>>());
        assert_eq!(log, first_log);
    }
}

#[test]
fn each_rule_fires_at_most_once() {
    // Two rules share a conclusion; only the first applicable one fires.
    let rules = RuleBase::new(vec![
        Rule::new(["fever", "loss_of_taste"], "possible_covid").unwrap(),
        Rule::new(["cough", "loss_of_taste"], "possible_covid").unwrap(),
        Rule::new(["possible_covid", "loss_of_taste"], "diagnose_covid").unwrap(),
        Rule::new(["x"], "y").unwrap(),
        Rule::new(["y"], "x").unwrap(),
    ]);
    let mut kb = KnowledgeBase::with_rules(rules);
    kb.add_facts(facts(&["fever", "cough", "loss_of_taste", "x"]));

    let report = InferenceEngine::new().forward_chain(&mut kb, &mut NoopObserver);
    let mut ids: Vec<usize> = report.firings.iter().map(|e| e.rule_id.position()).collect();
    let fired = ids.len();
    ids.sort_unstable();
    ids.dedup();
    assert_eq!(ids.len(), fired);
    assert_eq!(ids, vec![1, 3, 4]);
}

#[test]
fn vacuous_rule_fires_on_first_pass() {
    let rules = RuleBase::new(vec![
        Rule::new(["axiom"], "theorem").unwrap(),
        Rule::new(Vec::<String>::new(), "axiom").unwrap(),
    ]);
    let mut kb = KnowledgeBase::with_rules(rules);

    let report = InferenceEngine::new().forward_chain(&mut kb, &mut NoopObserver);
    assert_eq!(report.firings[0].conclusion.as_str(), "axiom");
    assert_eq!(report.firings[0].pass, 1);
    assert_eq!(report.firings[1].pass, 2);
    assert!(kb.facts().contains("theorem"));
}

#[test]
fn vacuous_rule_respects_existing_conclusion() {
    let rules = RuleBase::new(vec![Rule::new(Vec::<String>::new(), "axiom").unwrap()]);
    let mut log = EventLog::new();
    run(&rules, facts(&["axiom"]), &mut log);
    assert!(log.is_empty());
}

#[test]
fn rule_order_changes_events_not_result() {
    let forward = RuleBase::new(vec![
        Rule::new(["a"], "b").unwrap(),
        Rule::new(["b"], "c").unwrap(),
        Rule::new(["c", "a"], "d").unwrap(),
    ]);
    let backward: RuleBase = forward.as_slice().iter().rev().cloned().collect();

    let mut fwd_log = EventLog::new();
    let mut bwd_log = EventLog::new();
    let fwd = run(&forward, facts(&["a"]), &mut fwd_log);
    let bwd = run(&backward, facts(&["a"]), &mut bwd_log);

    assert_eq!(fwd, bwd);
    assert_eq!(conclusions(&fwd_log), conclusions(&bwd_log));
    let fwd_passes: Vec<usize> = fwd_log.firings().map(|e| e.pass).collect();
    let bwd_passes: Vec<usize> = bwd_log.firings().map(|e| e.pass).collect();
    assert_eq!(fwd_passes, vec![1, 1, 1]);
    assert_eq!(bwd_passes, vec![1, 2, 3]);
}

#[test]
fn rule_base_survives_across_runs_until_swapped() {
    let mut kb = KnowledgeBase::with_rules(flu_rules());
    kb.add_facts(facts(&["fever", "cough"]));
    let engine = InferenceEngine::new();
    assert_eq!(engine.forward_chain(&mut kb, &mut NoopObserver).fired(), 1);

    kb.reset_facts();
    kb.add_facts(facts(&["fever", "cough"]));
    assert_eq!(engine.forward_chain(&mut kb, &mut NoopObserver).fired(), 1);

    kb.set_rules(RuleBase::empty());
    kb.reset_facts();
    kb.add_facts(facts(&["fever", "cough"]));
    let report = engine.forward_chain(&mut kb, &mut NoopObserver);
    assert_eq!(report.fired(), 0);
    assert_eq!(report.passes, 1);
}
