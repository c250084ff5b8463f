//! Policy fusion: blending the learned Q-function with advisor multipliers.
//!
//! The learned Q-values become a Boltzmann distribution over legal actions.
//! Each advisor's multipliers are scored by how sharply they agree with that
//! distribution (`c_i = exp(max_a π(a) · m_i(a))`), the scores are
//! normalised into weights, and the weighted sum of the *raw* multipliers
//! rescales the Boltzmann distribution. The highest-scoring legal action is
//! played.
//!
//! This is a decision heuristic, not a probabilistic model: confidences come
//! from the blended distributions while the aggregate is built from the raw
//! multipliers, and both halves are kept as they are.

use crate::{
    Result,
    advice::{AdvisorPolicyResolver, Recommendation},
    ports::GameState,
    q_learning::QFunction,
    types::{ActionDistribution, Direction},
};

/// Boltzmann (softmax) distribution of `Q(state, ·)` over the legal actions
/// of `state`.
///
/// Every direction is present; illegal ones carry probability zero. With no
/// legal actions every entry is zero.
pub fn boltzmann_policy<S, Q>(q_function: &mut Q, state: &S) -> Result<ActionDistribution>
where
    S: GameState,
    Q: QFunction<S> + ?Sized,
{
    let mut policy = ActionDistribution::uniform(0.0);
    let legal_actions = state.legal_actions();
    if legal_actions.is_empty() {
        return Ok(policy);
    }

    let mut q_values = Vec::with_capacity(legal_actions.len());
    for &action in &legal_actions {
        q_values.push((action, q_function.predict(state, action)?));
    }
    // Shifting by the max leaves the ratios unchanged and keeps exp finite.
    let shift = q_values
        .iter()
        .map(|(_, q)| *q)
        .fold(f64::NEG_INFINITY, f64::max);
    let total: f64 = q_values.iter().map(|(_, q)| (q - shift).exp()).sum();
    for (action, q) in q_values {
        policy.set(action, (q - shift).exp() / total);
    }
    Ok(policy)
}

/// Everything computed by one [`PolicyFusionEngine::fuse`] call.
#[derive(Debug, Clone, PartialEq)]
pub struct FusionOutcome {
    /// Chosen action, `None` when the state has no legal actions.
    pub action: Option<Direction>,
    /// Boltzmann distribution of the Q-function.
    pub base_policy: ActionDistribution,
    /// Per-advisor weight, `None` for abstaining advisors.
    pub advisor_weights: Vec<Option<f64>>,
    /// Weighted sum of the participating advisors' raw multipliers.
    pub net_advice: ActionDistribution,
    /// `base_policy · net_advice`.
    pub combined_policy: ActionDistribution,
}

/// Turns the active Q-function into an action, optionally under advice.
pub struct PolicyFusionEngine<S> {
    resolver: Option<AdvisorPolicyResolver<S>>,
}

impl<S: GameState> PolicyFusionEngine<S> {
    pub fn new(resolver: AdvisorPolicyResolver<S>) -> Self {
        Self {
            resolver: Some(resolver),
        }
    }

    /// Engine that plays the Boltzmann argmax with no advice.
    pub fn without_advisors() -> Self {
        Self { resolver: None }
    }

    pub fn advisor_count(&self) -> usize {
        self.resolver.as_ref().map_or(0, AdvisorPolicyResolver::count)
    }

    pub fn base_policy<Q>(&self, q_function: &mut Q, state: &S) -> Result<ActionDistribution>
    where
        Q: QFunction<S> + ?Sized,
    {
        boltzmann_policy(q_function, state)
    }

    /// Blend the Q-function's Boltzmann policy with every participating
    /// advisor and pick the best legal action.
    ///
    /// # Errors
    ///
    /// Propagates Q-function failures and unreadable or malformed advisor
    /// records; the decision is aborted rather than made without them.
    pub fn fuse<Q>(&self, q_function: &mut Q, state: &S) -> Result<FusionOutcome>
    where
        Q: QFunction<S> + ?Sized,
    {
        let legal_actions = state.legal_actions();
        let base_policy = boltzmann_policy(q_function, state)?;
        if legal_actions.is_empty() {
            return Ok(FusionOutcome {
                action: None,
                net_advice: ActionDistribution::uniform(1.0),
                combined_policy: base_policy.clone(),
                base_policy,
                advisor_weights: Vec::new(),
            });
        }

        let recommendations = match &self.resolver {
            Some(resolver) => resolver.resolve(state)?,
            None => Vec::new(),
        };

        let confidences: Vec<Option<f64>> = recommendations
            .iter()
            .map(|recommendation| {
                recommendation
                    .multipliers()
                    .map(|multipliers| base_policy.product(multipliers).max_value().exp())
            })
            .collect();
        let total_confidence: f64 = confidences.iter().flatten().sum();
        let advisor_weights: Vec<Option<f64>> = confidences
            .iter()
            .map(|confidence| confidence.map(|c| c / total_confidence))
            .collect();

        let net_advice = if total_confidence > 0.0 {
            let mut net = ActionDistribution::new();
            for (recommendation, weight) in recommendations.iter().zip(&advisor_weights) {
                if let (Recommendation::Multipliers(multipliers), Some(weight)) =
                    (recommendation, weight)
                {
                    net.accumulate(&multipliers.scaled(*weight));
                }
            }
            net
        } else {
            ActionDistribution::uniform(1.0)
        };

        let combined_policy = base_policy.product(&net_advice);
        let action = combined_policy.argmax_within(&legal_actions);
        tracing::debug!(
            ?advisor_weights,
            ?net_advice,
            ?combined_policy,
            ?action,
            "fused policy"
        );

        Ok(FusionOutcome {
            action,
            base_policy,
            advisor_weights,
            net_advice,
            combined_policy,
        })
    }
}
