use std::collections::HashMap;

use chrono::NaiveDate;

use crate::data::synthetic::{ChainRow, MarketSummary, Sentiment};
use crate::data::Instrument;
use crate::engine::types::{Bound, Evaluation, LegBreakdown, SnapshotEvaluation, StrategyDef};
use crate::paper::{PaperTrade, Portfolio};

use super::build::BuiltPosition;
use super::response_types::{
    BreakdownResponse, BuildStrategyResponse, EvaluatePayoffResponse, InstrumentsResponse,
    MarketSummaryResponse, OptionChainResponse, PaperTradeResponse, PortfolioResponse,
    SnapshotSummary, SnapshotsResponse, StrategiesResponse, StrategyInfo,
};

fn format_pnl(value: f64) -> String {
    if value >= 0.0 {
        format!("+{value:.2}")
    } else {
        format!("-{:.2}", value.abs())
    }
}

/// Finite values as signed amounts; unbounded as "Unlimited".
pub fn format_bound(bound: Bound) -> String {
    match bound {
        Bound::Finite(v) => format_pnl(v),
        Bound::Unbounded => "Unlimited".to_string(),
    }
}

fn format_margin(bound: Bound) -> String {
    match bound {
        Bound::Finite(v) => format!("{v:.0}"),
        Bound::Unbounded => "Unlimited".to_string(),
    }
}

fn format_breakevens(breakevens: &[f64]) -> String {
    if breakevens.is_empty() {
        return "none".to_string();
    }
    breakevens
        .iter()
        .map(|b| format!("{b:.0}"))
        .collect::<Vec<_>>()
        .join(", ")
}

fn describe_evaluation(eval: &Evaluation) -> String {
    let premium = if eval.net_premium >= 0.0 {
        format!("net credit {:.2}", eval.net_premium)
    } else {
        format!("net debit {:.2}", eval.net_premium.abs())
    };
    format!(
        "max profit {}, max loss {}, breakevens {}, POP {:.1}%, margin {}, {premium}",
        format_bound(eval.max_profit),
        format_bound(eval.max_loss),
        format_breakevens(&eval.breakevens),
        eval.pop,
        format_margin(eval.margin_required),
    )
}

fn risk_steps(eval: &Evaluation) -> Vec<String> {
    let mut steps = Vec::new();
    if eval.max_loss.is_unbounded() {
        steps.push(
            "Loss is unlimited: add a long call above the highest short call strike to cap it"
                .to_string(),
        );
    }
    if eval.expiries.len() > 1 {
        steps.push(format!(
            "Legs span {} expiries; use evaluate_snapshots to compare each expiry view",
            eval.expiries.len()
        ));
    }
    if let Some(b) = eval.breakevens.first() {
        steps.push(format!(
            "Use payoff_breakdown at price {b:.0} to see each leg's contribution at breakeven"
        ));
    }
    steps
}

pub fn format_evaluate_payoff(
    evaluation: Evaluation,
    spot_price: f64,
    lot_size: u32,
) -> EvaluatePayoffResponse {
    let (summary, suggested_next_steps) = if evaluation.leg_count == 0 {
        (
            format!("No active legs at spot {spot_price:.2}; the payoff is flat at zero."),
            vec![
                "Use list_strategies to pick a template".to_string(),
                "Use build_strategy to create legs priced from an option chain".to_string(),
            ],
        )
    } else {
        let mut steps = risk_steps(&evaluation);
        steps.push("Adjust zoom to widen or narrow the price window".to_string());
        (
            format!(
                "{} leg(s) at spot {spot_price:.2}, lot size {lot_size}: {}. Current P&L {}.",
                evaluation.leg_count,
                describe_evaluation(&evaluation),
                format_pnl(evaluation.current_pnl),
            ),
            steps,
        )
    };

    EvaluatePayoffResponse {
        summary,
        spot_price,
        lot_size,
        evaluation,
        suggested_next_steps,
    }
}

fn summarize_snapshot(snapshot: &SnapshotEvaluation) -> SnapshotSummary {
    let e = &snapshot.evaluation;
    SnapshotSummary {
        snapshot_expiry: snapshot.snapshot_expiry,
        leg_count: e.leg_count,
        breakevens: e.breakevens.clone(),
        pop: e.pop,
        max_profit: e.max_profit,
        max_loss: e.max_loss,
        current_pnl: e.current_pnl,
        margin_required: e.margin_required,
        net_premium: e.net_premium,
    }
}

pub fn format_snapshots(
    snapshots: &[SnapshotEvaluation],
    spot_price: f64,
    lot_size: u32,
) -> SnapshotsResponse {
    let summaries: Vec<SnapshotSummary> = snapshots.iter().map(summarize_snapshot).collect();

    let lines: Vec<String> = summaries
        .iter()
        .map(|s| {
            let label = s
                .snapshot_expiry
                .map_or_else(|| "ALL".to_string(), |d| d.to_string());
            format!(
                "{label}: {} leg(s), max loss {}, margin {}",
                s.leg_count,
                format_bound(s.max_loss),
                format_margin(s.margin_required),
            )
        })
        .collect();
    let summary = format!("{} snapshot(s). {}.", summaries.len(), lines.join("; "));

    let mut suggested_next_steps = Vec::new();
    if let Some(worst) = summaries
        .iter()
        .filter(|s| s.snapshot_expiry.is_some() && s.margin_required.is_unbounded())
        .find_map(|s| s.snapshot_expiry)
    {
        suggested_next_steps.push(format!(
            "The {worst} snapshot needs unlimited margin on its own; \
             check the short calls expiring that day"
        ));
    }
    suggested_next_steps
        .push("Use evaluate_payoff with snapshot_expiry set to view one curve in full".to_string());

    SnapshotsResponse {
        summary,
        spot_price,
        lot_size,
        snapshots: summaries,
        suggested_next_steps,
    }
}

pub fn format_breakdown(breakdown: LegBreakdown, lot_size: u32) -> BreakdownResponse {
    let largest = breakdown
        .legs
        .iter()
        .max_by(|a, b| a.payoff.abs().total_cmp(&b.payoff.abs()));

    let mut summary = format!(
        "At price {:.2} the position P&L is {} across {} leg(s).",
        breakdown.price,
        format_pnl(breakdown.total),
        breakdown.legs.len(),
    );
    if let Some(leg) = largest {
        summary.push_str(&format!(
            " Largest contributor: {:?} {:.0} {} ({}).",
            leg.action,
            leg.strike,
            leg.option_type.as_str(),
            format_pnl(leg.payoff),
        ));
    }

    BreakdownResponse {
        summary,
        lot_size,
        breakdown,
        suggested_next_steps: vec![
            "Use evaluate_payoff to see the full curve around this price".to_string(),
        ],
    }
}

pub fn format_strategies(strategies: Vec<StrategyInfo>) -> StrategiesResponse {
    let total = strategies.len();
    let mut categories: HashMap<String, usize> = HashMap::new();
    for s in &strategies {
        *categories.entry(s.category.clone()).or_default() += 1;
    }

    let cat_parts: Vec<String> = {
        let mut sorted: Vec<_> = categories.iter().collect();
        sorted.sort_by(|a, b| b.1.cmp(a.1).then_with(|| a.0.cmp(b.0)));
        sorted
            .iter()
            .map(|(cat, count)| format!("{cat} ({count})"))
            .collect()
    };

    let summary = format!(
        "{} strategies available across {} categories: {}.",
        total,
        categories.len(),
        cat_parts.join(", "),
    );

    StrategiesResponse {
        summary,
        total,
        categories,
        strategies,
        suggested_next_steps: vec![
            "Use build_strategy with a strategy name and instrument to price its legs"
                .to_string(),
            "Use list_instruments to see available underlyings and expiries".to_string(),
        ],
    }
}

pub fn format_build(
    def: &StrategyDef,
    instrument: &Instrument,
    built: BuiltPosition,
) -> BuildStrategyResponse {
    let expiry_text = match built.far_expiry {
        Some(far) => format!("{} / {far}", built.expiry),
        None => built.expiry.to_string(),
    };
    let summary = format!(
        "Built {} on {} (spot {:.2}, expiry {expiry_text}, lot size {}): {}.",
        def.name,
        instrument.symbol,
        instrument.spot_price,
        built.lot_size,
        describe_evaluation(&built.evaluation),
    );

    let mut suggested_next_steps = risk_steps(&built.evaluation);
    suggested_next_steps.push(
        "Pass the returned legs to evaluate_payoff to tweak strikes, premiums or quantities"
            .to_string(),
    );

    BuildStrategyResponse {
        summary,
        strategy: def.name.clone(),
        instrument: instrument.symbol.clone(),
        spot_price: instrument.spot_price,
        lot_size: built.lot_size,
        as_of: built.as_of,
        expiry: built.expiry,
        far_expiry: built.far_expiry,
        legs: built.legs,
        evaluation: built.evaluation,
        suggested_next_steps,
    }
}

pub fn format_instruments(instruments: Vec<Instrument>) -> InstrumentsResponse {
    let names: Vec<String> = instruments
        .iter()
        .map(|i| format!("{} (lot {})", i.symbol, i.lot_size))
        .collect();
    InstrumentsResponse {
        summary: format!("{} instruments: {}.", instruments.len(), names.join(", ")),
        instruments,
        suggested_next_steps: vec![
            "Use get_option_chain to see strikes and premiums for an instrument".to_string(),
            "Use market_summary for open interest and put/call ratio".to_string(),
        ],
    }
}

pub fn format_chain(
    instrument: &Instrument,
    as_of: NaiveDate,
    rows: Vec<ChainRow>,
    pcr: f64,
) -> OptionChainResponse {
    let mut expiries: Vec<NaiveDate> = rows.iter().map(|r| r.expiry).collect();
    expiries.sort_unstable();
    expiries.dedup();

    let strikes = rows.len() / expiries.len().max(1);
    let summary = format!(
        "{} chain as of {as_of}: {} expiry(ies) × {strikes} strikes around spot {:.2}, \
         PCR {pcr:.2}.",
        instrument.symbol,
        expiries.len(),
        instrument.spot_price,
    );

    OptionChainResponse {
        summary,
        instrument: instrument.symbol.clone(),
        spot_price: instrument.spot_price,
        as_of,
        expiries,
        pcr,
        rows,
        suggested_next_steps: vec![
            "Use build_strategy to create legs priced from this chain (pass the same seed)"
                .to_string(),
            "Pass the chain strikes as available_strikes to evaluate_payoff".to_string(),
        ],
    }
}

pub fn format_market_summary(as_of: NaiveDate, market: MarketSummary) -> MarketSummaryResponse {
    let tone = match market.sentiment {
        Sentiment::Bullish => "bullish",
        Sentiment::Bearish => "bearish",
        Sentiment::Neutral => "neutral",
    };
    let summary = format!(
        "{} at {:.2} ({:+.2}%). Call OI {}, put OI {}, PCR {:.2}: {tone}.",
        market.symbol,
        market.spot_price,
        market.change_percent,
        market.total_call_oi,
        market.total_put_oi,
        market.pcr,
    );
    let suggested_next_steps = match market.sentiment {
        Sentiment::Bullish => vec!["Consider bull_call_spread or bull_put_spread".to_string()],
        Sentiment::Bearish => vec!["Consider bear_put_spread or bear_call_spread".to_string()],
        Sentiment::Neutral => vec!["Consider iron_condor or short_strangle".to_string()],
    };

    MarketSummaryResponse {
        summary,
        as_of,
        market,
        suggested_next_steps,
    }
}

fn describe_trade(trade: &PaperTrade) -> String {
    format!(
        "{:?} {} x {} {:.0} {} {}",
        trade.action,
        trade.quantity,
        trade.instrument,
        trade.strike,
        trade.option_type.as_str(),
        trade.expiry,
    )
}

pub fn format_paper_open(trade: PaperTrade) -> PaperTradeResponse {
    let summary = format!(
        "Opened {} at {:.2} (id {}).",
        describe_trade(&trade),
        trade.entry_price,
        trade.id
    );
    PaperTradeResponse {
        summary,
        pnl: trade.pnl(),
        trade,
        suggested_next_steps: vec![
            "Use list_paper_positions with a later as_of to mark positions to market".to_string(),
            "Use close_paper_trade with this id to book the P&L".to_string(),
        ],
    }
}

pub fn format_paper_close(trade: PaperTrade) -> PaperTradeResponse {
    let pnl = trade.pnl();
    let summary = format!(
        "Closed {} at {:.2} (entry {:.2}). P&L {}.",
        describe_trade(&trade),
        trade.current_price,
        trade.entry_price,
        format_pnl(pnl),
    );
    PaperTradeResponse {
        summary,
        pnl,
        trade,
        suggested_next_steps: vec![
            "Use list_paper_positions to see the order history and realized P&L".to_string(),
        ],
    }
}

pub fn format_portfolio(
    portfolio: Portfolio,
    marked_as_of: Option<NaiveDate>,
) -> PortfolioResponse {
    let mark = marked_as_of.map_or_else(
        || "at last marks".to_string(),
        |d| format!("marked as of {d}"),
    );
    let summary = format!(
        "{} open position(s) {mark}, unrealized P&L {}. {} closed, realized P&L {}.",
        portfolio.positions.len(),
        format_pnl(portfolio.unrealized_pnl),
        portfolio.history.len(),
        format_pnl(portfolio.realized_pnl),
    );
    let suggested_next_steps = if portfolio.positions.is_empty() {
        vec!["Use get_option_chain then open_paper_trade to start a position".to_string()]
    } else {
        vec![
            "Use close_paper_trade with a position id to book its P&L".to_string(),
            "Pass as_of to reprice positions on a later date".to_string(),
        ]
    };

    PortfolioResponse {
        summary,
        marked_as_of,
        portfolio,
        suggested_next_steps,
    }
}
