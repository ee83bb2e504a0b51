//! Exhaustive seasonal order search ranked by information criterion.
//!
//! Answers: of these candidate SARIMA orders, which best explains the
//! observed series without overfitting, as measured by penalized
//! likelihood? The search is deliberately brute force: the grids in use
//! are small (at most a few hundred candidates) and an exhaustive sweep is
//! robust to the criterion's non-convexity in order space, where a
//! stepwise search can stall in a local minimum.

use std::fmt;

use crate::core::TimeSeries;
use crate::models::sarima::{SarimaSpec, SARIMA};
use crate::models::Forecaster;

/// A candidate order tuple: non-seasonal and seasonal AR/MA orders.
///
/// The differencing orders and seasonal period are fixed per search, not
/// per candidate; see [`OrderSearch`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CandidateOrder {
    /// Non-seasonal AR order (p).
    pub p: usize,
    /// Non-seasonal MA order (q).
    pub q: usize,
    /// Seasonal AR order (P).
    pub cap_p: usize,
    /// Seasonal MA order (Q).
    pub cap_q: usize,
}

impl CandidateOrder {
    /// Create a candidate order.
    pub fn new(p: usize, q: usize, cap_p: usize, cap_q: usize) -> Self {
        Self { p, q, cap_p, cap_q }
    }
}

impl fmt::Display for CandidateOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "({},{})x({},{})",
            self.p, self.q, self.cap_p, self.cap_q
        )
    }
}

/// Cross product of four independent order ranges.
///
/// Iterates in row-major order: `p` outermost, then `q`, `cap_p`, and
/// `cap_q` innermost. The product is distinct by construction, so no
/// deduplication is needed.
#[derive(Debug, Clone)]
pub struct OrderGrid {
    p: std::ops::Range<usize>,
    q: std::ops::Range<usize>,
    cap_p: std::ops::Range<usize>,
    cap_q: std::ops::Range<usize>,
}

impl OrderGrid {
    /// Build a grid from explicit ranges for each order.
    pub fn new(
        p: std::ops::Range<usize>,
        q: std::ops::Range<usize>,
        cap_p: std::ops::Range<usize>,
        cap_q: std::ops::Range<usize>,
    ) -> Self {
        Self { p, q, cap_p, cap_q }
    }

    /// Grid with every order ranging over `0..limit`.
    pub fn uniform(limit: usize) -> Self {
        Self::new(0..limit, 0..limit, 0..limit, 0..limit)
    }

    /// Number of candidates in the grid.
    pub fn len(&self) -> usize {
        self.p.len() * self.q.len() * self.cap_p.len() * self.cap_q.len()
    }

    /// Whether the grid holds no candidates.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Materialize the candidates in iteration order.
    pub fn candidates(&self) -> Vec<CandidateOrder> {
        let mut out = Vec::with_capacity(self.len());
        for p in self.p.clone() {
            for q in self.q.clone() {
                for cap_p in self.cap_p.clone() {
                    for cap_q in self.cap_q.clone() {
                        out.push(CandidateOrder::new(p, q, cap_p, cap_q));
                    }
                }
            }
        }
        out
    }
}

impl IntoIterator for OrderGrid {
    type Item = CandidateOrder;
    type IntoIter = std::vec::IntoIter<CandidateOrder>;

    fn into_iter(self) -> Self::IntoIter {
        self.candidates().into_iter()
    }
}

/// Information criterion used to rank candidates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SelectionCriterion {
    /// Akaike information criterion.
    #[default]
    AIC,
    /// Bayesian information criterion.
    BIC,
}

/// A surviving candidate and its criterion score. Lower is better.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RankedOrder {
    /// The candidate order.
    pub order: CandidateOrder,
    /// Criterion value of the fitted model.
    pub score: f64,
}

/// Exhaustive order search with fixed differencing orders and seasonal
/// period.
///
/// # Example
/// ```
/// use gridcast::core::TimeSeries;
/// use gridcast::selection::{OrderGrid, OrderSearch};
///
/// let values: Vec<f64> = (0..60)
///     .map(|i| 12.0 + (2.0 * std::f64::consts::PI * i as f64 / 4.0).sin())
///     .collect();
/// let series = TimeSeries::yearly(1950, values).unwrap();
///
/// let search = OrderSearch::new(1, 1, 4);
/// let ranking = search.rank(&series, OrderGrid::uniform(2));
///
/// // Surviving fits come back best first.
/// for pair in ranking.windows(2) {
///     assert!(pair[0].score <= pair[1].score);
/// }
/// ```
#[derive(Debug, Clone)]
pub struct OrderSearch {
    /// Non-seasonal differencing order (d).
    d: usize,
    /// Seasonal differencing order (D).
    cap_d: usize,
    /// Seasonal period (s).
    period: usize,
    /// Ranking criterion.
    criterion: SelectionCriterion,
}

impl OrderSearch {
    /// Create a search with fixed differencing orders `d`, `D` and
    /// seasonal period `s`, ranking by AIC.
    pub fn new(d: usize, cap_d: usize, period: usize) -> Self {
        Self {
            d,
            cap_d,
            period,
            criterion: SelectionCriterion::default(),
        }
    }

    /// Rank by a different criterion.
    pub fn with_criterion(mut self, criterion: SelectionCriterion) -> Self {
        self.criterion = criterion;
        self
    }

    /// Fit one model per candidate and return the survivors sorted
    /// ascending by criterion score.
    ///
    /// A candidate whose fit returns an error (insufficient data, invalid
    /// parameterization, numerical failure) or whose score is non-finite
    /// is skipped silently; the sweep always runs to completion. If every
    /// candidate fails the ranking is empty. Ties keep grid iteration
    /// order: the sort is stable and no secondary key is defined.
    pub fn rank<I>(&self, series: &TimeSeries, grid: I) -> Vec<RankedOrder>
    where
        I: IntoIterator<Item = CandidateOrder>,
    {
        let mut ranking: Vec<RankedOrder> = grid
            .into_iter()
            .filter_map(|order| {
                self.evaluate(series, order)
                    .map(|score| RankedOrder { order, score })
            })
            .collect();

        ranking.sort_by(|a, b| {
            a.score
                .partial_cmp(&b.score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        ranking
    }

    /// Rank the grid and return the best surviving candidate, if any.
    pub fn best<I>(&self, series: &TimeSeries, grid: I) -> Option<RankedOrder>
    where
        I: IntoIterator<Item = CandidateOrder>,
    {
        self.rank(series, grid).into_iter().next()
    }

    /// Fit a single candidate and score it. `None` means the candidate is
    /// dropped from the ranking.
    fn evaluate(&self, series: &TimeSeries, order: CandidateOrder) -> Option<f64> {
        let spec = SarimaSpec::new(
            order.p,
            self.d,
            order.q,
            order.cap_p,
            self.cap_d,
            order.cap_q,
            self.period,
        );

        let mut model = SARIMA::from_spec(spec);
        if model.fit(series).is_err() {
            return None;
        }

        let score = match self.criterion {
            SelectionCriterion::AIC => model.aic()?,
            SelectionCriterion::BIC => model.bic()?,
        };
        score.is_finite().then_some(score)
    }
}
