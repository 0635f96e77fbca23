#![cfg(kani)]
//! Kani proof harnesses for the rule execution and text-function model.
//!
//! These harnesses verify core properties using models that mirror the
//! semantics of `RuleEngineExecution::call` and `d2:left` / `d2:right`
//! without `String`, expression parsing, or variable resolution.
//!
//! Model:
//! - Each rule has a boolean condition result and a number of actions.
//! - Rules are walked in index order; a true rule emits `(rule, action)`
//!   pairs for each of its actions in order.
//! - Text is a fixed array of bytes standing in for characters; `left` and
//!   `right` take a clamped prefix or suffix of it.
//!
//! Run with: `cargo kani --tests --harness <harness_name>`

/// Maximum number of rules / actions per rule / characters for bounded proofs.
const MAX_N: usize = 4;
const MAX_EFFECTS: usize = MAX_N * MAX_N;

/// Mirror of the count clamping used by `d2:left` and `d2:right`.
fn clamp_count(count: i64, len: usize) -> usize {
    if count <= 0 {
        0
    } else {
        let c = count as u64;
        if c > len as u64 {
            len
        } else {
            c as usize
        }
    }
}

/// Walk rules in order and write the emitted `(rule, action)` pairs into
/// `out`. Returns the number of effects written.
fn model_call(
    n_rules: usize,
    holds: &[bool; MAX_N],
    actions: &[usize; MAX_N],
    out: &mut [(usize, usize); MAX_EFFECTS],
) -> usize {
    let mut len = 0;
    let mut i = 0;
    while i < n_rules {
        if holds[i] {
            let mut j = 0;
            while j < actions[i] {
                out[len] = (i, j);
                len += 1;
                j += 1;
            }
        }
        i += 1;
    }
    len
}

// ---------------------------------------------------------------------------
// Proof 1: clamp_count stays within [0, len] and is exact in range
// ---------------------------------------------------------------------------

#[kani::proof]
fn clamp_count_bounded() {
    let count: i64 = kani::any();
    let len: usize = kani::any();
    kani::assume(len <= 64);

    let take = clamp_count(count, len);
    assert!(take <= len);
    if count <= 0 {
        assert_eq!(take, 0);
    }
    if count > 0 && (count as u64) <= len as u64 {
        assert_eq!(take, count as usize);
    }
}

// ---------------------------------------------------------------------------
// Proof 2: left and right never index out of bounds and split the text
//
// For any length and count, the prefix of `clamp(n)` and the suffix of
// `len - clamp(n)` characters cover the text exactly once.
// ---------------------------------------------------------------------------

#[kani::proof]
#[kani::unwind(6)]
fn left_right_partition() {
    let text: [u8; MAX_N] = kani::any();
    let len: usize = kani::any();
    kani::assume(len <= MAX_N);
    let count: i64 = kani::any();

    let take_left = clamp_count(count, len);
    let take_right = clamp_count((len - take_left) as i64, len);
    assert_eq!(take_left + take_right, len);

    // right: reverse, take prefix, reverse back == suffix starting at len - take
    let mut reversed = [0u8; MAX_N];
    let mut i = 0;
    while i < len {
        reversed[i] = text[len - 1 - i];
        i += 1;
    }
    let mut k = 0;
    while k < take_right {
        let from_reversed = reversed[take_right - 1 - k];
        let from_suffix = text[len - take_right + k];
        assert_eq!(from_reversed, from_suffix);
        k += 1;
    }
}

// ---------------------------------------------------------------------------
// Proof 3: only rule k true yields exactly rule k's actions in order
// ---------------------------------------------------------------------------

#[kani::proof]
#[kani::unwind(6)]
fn single_true_rule_emits_its_actions() {
    let n_rules: usize = kani::any();
    kani::assume(n_rules >= 1 && n_rules <= MAX_N);
    let k: usize = kani::any();
    kani::assume(k < n_rules);

    let mut actions = [0usize; MAX_N];
    let mut i = 0;
    while i < MAX_N {
        actions[i] = kani::any();
        kani::assume(actions[i] <= MAX_N);
        i += 1;
    }

    let mut holds = [false; MAX_N];
    holds[k] = true;

    let mut out = [(0usize, 0usize); MAX_EFFECTS];
    let len = model_call(n_rules, &holds, &actions, &mut out);

    assert_eq!(len, actions[k]);
    let mut j = 0;
    while j < len {
        assert_eq!(out[j], (k, j));
        j += 1;
    }
}

// ---------------------------------------------------------------------------
// Proof 4: effects are grouped by rule in ascending rule order
// ---------------------------------------------------------------------------

#[kani::proof]
#[kani::unwind(18)]
fn effects_follow_rule_then_action_order() {
    let n_rules: usize = kani::any();
    kani::assume(n_rules <= MAX_N);
    let holds: [bool; MAX_N] = kani::any();
    let mut actions = [0usize; MAX_N];
    let mut i = 0;
    while i < MAX_N {
        actions[i] = kani::any();
        kani::assume(actions[i] <= MAX_N);
        i += 1;
    }

    let mut out = [(0usize, 0usize); MAX_EFFECTS];
    let len = model_call(n_rules, &holds, &actions, &mut out);

    let mut e = 1;
    while e < len {
        let (prev_rule, prev_action) = out[e - 1];
        let (rule, action) = out[e];
        assert!(prev_rule < rule || (prev_rule == rule && action == prev_action + 1));
        e += 1;
    }

    let mut e = 0;
    while e < len {
        let (rule, action) = out[e];
        assert!(holds[rule]);
        assert!(action < actions[rule]);
        e += 1;
    }
}
