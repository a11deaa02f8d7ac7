use chrono::NaiveDate;
use garde::Validate;
use rmcp::{
    handler::server::{router::tool::ToolRouter, wrapper::Json},
    model::{Implementation, ServerCapabilities, ServerInfo},
    tool, tool_handler, tool_router, ServerHandler,
};
use schemars::JsonSchema;
use serde::Deserialize;
use std::sync::Arc;

use crate::config::ServerConfig;
use crate::data::{QuoteSource, SyntheticSource};
use crate::engine::cache::EvaluationCache;
use crate::engine::types::{Action, OptionLeg, OptionType};
use crate::paper::{OpenOrder, PaperLedger};
use crate::tools;
use crate::tools::build::BuildRequest;
use crate::tools::response_types::{
    BreakdownResponse, BuildStrategyResponse, EvaluatePayoffResponse, InstrumentsResponse,
    MarketSummaryResponse, OptionChainResponse, PaperTradeResponse, PortfolioResponse,
    SnapshotsResponse, StrategiesResponse,
};
use crate::tools::CurveOptions;

#[derive(Clone)]
pub struct PayoffServer {
    pub config: Arc<ServerConfig>,
    pub cache: Arc<EvaluationCache>,
    pub source: Arc<dyn QuoteSource>,
    pub ledger: Arc<PaperLedger>,
    tool_router: ToolRouter<Self>,
}

impl PayoffServer {
    pub fn new(config: ServerConfig, source: Arc<dyn QuoteSource>) -> Self {
        Self {
            cache: Arc::new(EvaluationCache::new(config.cache_capacity)),
            config: Arc::new(config),
            source,
            ledger: Arc::new(PaperLedger::new()),
            tool_router: Self::tool_router(),
        }
    }

    /// Server over the built-in synthetic instruments.
    pub fn synthetic(config: ServerConfig) -> Self {
        Self::new(config, Arc::new(SyntheticSource::default()))
    }
}

#[derive(Debug, Deserialize, JsonSchema, Validate)]
pub struct EvaluatePayoffParams {
    /// Option legs of the position (may be empty)
    #[garde(length(max = 64))]
    pub legs: Vec<OptionLeg>,
    /// Current underlying price
    #[garde(range(min = 0.0))]
    pub spot_price: f64,
    /// Expiry snapshot to view (YYYY-MM-DD); omit for all expiries
    #[garde(skip)]
    pub snapshot_expiry: Option<NaiveDate>,
    #[serde(flatten)]
    #[garde(dive)]
    pub options: CurveOptions,
}

#[derive(Debug, Deserialize, JsonSchema, Validate)]
pub struct EvaluateSnapshotsParams {
    /// Option legs of the position
    #[garde(length(max = 64))]
    pub legs: Vec<OptionLeg>,
    /// Current underlying price
    #[garde(range(min = 0.0))]
    pub spot_price: f64,
    #[serde(flatten)]
    #[garde(dive)]
    pub options: CurveOptions,
}

#[derive(Debug, Deserialize, JsonSchema, Validate)]
pub struct PayoffBreakdownParams {
    /// Option legs of the position
    #[garde(length(max = 64))]
    pub legs: Vec<OptionLeg>,
    /// Underlying price at which to break the P&L down
    #[garde(range(min = 0.0))]
    pub price: f64,
    /// Expiry snapshot to view (YYYY-MM-DD); omit for all expiries
    #[garde(skip)]
    pub snapshot_expiry: Option<NaiveDate>,
    #[serde(flatten)]
    #[garde(dive)]
    pub options: CurveOptions,
}

#[derive(Debug, Deserialize, JsonSchema, Validate)]
pub struct BuildStrategyParams {
    /// Strategy name (e.g. '`iron_condor`')
    #[garde(length(min = 1, max = 64))]
    pub strategy: String,
    /// Instrument symbol (e.g. "NIFTY")
    #[garde(length(min = 1, max = 20), pattern(r"^[A-Za-z0-9._-]+$"))]
    pub instrument: String,
    /// Near-term expiry (YYYY-MM-DD); defaults to the nearest listed one
    #[garde(skip)]
    pub expiry: Option<NaiveDate>,
    /// Far-term expiry for calendar strategies; defaults to the next listed one
    #[garde(skip)]
    pub far_expiry: Option<NaiveDate>,
    /// Multiplier applied to every leg's quantity (default 1)
    #[garde(inner(range(min = 1, max = 1000)))]
    pub quantity: Option<u32>,
    /// Contract multiplier; defaults to the instrument's lot size
    #[garde(inner(range(min = 1)))]
    pub lot_size: Option<u32>,
    /// Pricing date (YYYY-MM-DD); defaults to today
    #[garde(skip)]
    pub as_of: Option<NaiveDate>,
    /// Seed for reproducible synthetic quotes
    #[garde(skip)]
    pub seed: Option<u64>,
}

#[derive(Debug, Deserialize, JsonSchema, Validate)]
pub struct OptionChainParams {
    /// Instrument symbol (e.g. "NIFTY")
    #[garde(length(min = 1, max = 20), pattern(r"^[A-Za-z0-9._-]+$"))]
    pub instrument: String,
    /// Expiry (YYYY-MM-DD); omit for every listed expiry
    #[garde(skip)]
    pub expiry: Option<NaiveDate>,
    /// Pricing date (YYYY-MM-DD); defaults to today
    #[garde(skip)]
    pub as_of: Option<NaiveDate>,
    /// Seed for reproducible synthetic quotes
    #[garde(skip)]
    pub seed: Option<u64>,
}

#[derive(Debug, Deserialize, JsonSchema, Validate)]
pub struct MarketSummaryParams {
    /// Instrument symbol (e.g. "NIFTY")
    #[garde(length(min = 1, max = 20), pattern(r"^[A-Za-z0-9._-]+$"))]
    pub instrument: String,
    /// Pricing date (YYYY-MM-DD); defaults to today
    #[garde(skip)]
    pub as_of: Option<NaiveDate>,
    /// Seed for reproducible synthetic quotes
    #[garde(skip)]
    pub seed: Option<u64>,
}

#[derive(Debug, Deserialize, JsonSchema, Validate)]
pub struct OpenPaperTradeParams {
    /// Instrument symbol (e.g. "NIFTY")
    #[garde(length(min = 1, max = 20), pattern(r"^[A-Za-z0-9._-]+$"))]
    pub instrument: String,
    /// Strike price; must be listed in the option chain
    #[garde(range(min = 0.0))]
    pub strike: f64,
    /// Contract expiry (YYYY-MM-DD)
    #[garde(skip)]
    pub expiry: NaiveDate,
    /// CALL/CE or PUT/PE
    #[garde(skip)]
    pub option_type: OptionType,
    /// BUY or SELL
    #[garde(skip)]
    pub action: Action,
    /// Number of contracts (default 1)
    #[garde(inner(range(min = 1, max = 100_000)))]
    pub quantity: Option<u32>,
    /// Pricing date (YYYY-MM-DD); defaults to today
    #[garde(skip)]
    pub as_of: Option<NaiveDate>,
    /// Seed for reproducible synthetic quotes
    #[garde(skip)]
    pub seed: Option<u64>,
}

#[derive(Debug, Deserialize, JsonSchema, Validate)]
pub struct ListPaperPositionsParams {
    /// Reprice open positions on this date (YYYY-MM-DD); omit to keep the last marks
    #[garde(skip)]
    pub as_of: Option<NaiveDate>,
    /// Seed for reproducible synthetic quotes
    #[garde(skip)]
    pub seed: Option<u64>,
}

#[derive(Debug, Deserialize, JsonSchema, Validate)]
pub struct ClosePaperTradeParams {
    /// Position id returned by open_paper_trade
    #[garde(length(min = 1, max = 64))]
    pub id: String,
    /// Reprice on this date before closing (YYYY-MM-DD); omit to close at the last mark
    #[garde(skip)]
    pub as_of: Option<NaiveDate>,
    /// Seed for reproducible synthetic quotes
    #[garde(skip)]
    pub seed: Option<u64>,
}

use rmcp::handler::server::wrapper::Parameters;

#[tool_router]
impl PayoffServer {
    /// Evaluate the payoff at expiry of a multi-leg options position.
    ///
    /// **Workflow Phase**: 2/3 (analysis)
    /// **When to use**: Whenever legs change; this is the core calculation
    /// **Prerequisites**: Legs from build_strategy or supplied directly
    /// **Next tools**: evaluate_snapshots (multi-expiry positions), payoff_breakdown
    ///
    /// Returns the sampled P&L curve, breakevens, probability of profit
    /// (share of sampled prices in profit), max profit/loss ("unbounded" when
    /// the leg structure implies it), P&L at spot and approximate margin.
    /// Lot size: lot_size, else the instrument's, else the server default.
    #[tool(name = "evaluate_payoff")]
    async fn evaluate_payoff(
        &self,
        Parameters(params): Parameters<EvaluatePayoffParams>,
    ) -> Result<Json<EvaluatePayoffResponse>, String> {
        params
            .validate()
            .map_err(|e| format!("Validation error: {e}"))?;
        let config = tools::evaluation_config(
            self.source.as_ref(),
            &self.config,
            &params.options,
            params.snapshot_expiry,
        )
        .map_err(|e| format!("Error: {e}"))?;
        config
            .validate()
            .map_err(|e| format!("Validation error: {e}"))?;

        Ok(Json(tools::evaluate::execute(
            &self.cache,
            &params.legs,
            params.spot_price,
            &config,
        )))
    }

    /// Evaluate the all-expiries view plus one view per distinct leg expiry.
    ///
    /// **Workflow Phase**: 2b/3 (analysis, multi-expiry positions)
    /// **When to use**: Calendars or any position whose legs expire on different dates
    /// **Prerequisites**: Legs with expiry dates
    /// **Next tool**: evaluate_payoff with snapshot_expiry for one full curve
    ///
    /// Output is ALL first, then ascending expiry; curves are omitted.
    #[tool(name = "evaluate_snapshots")]
    async fn evaluate_snapshots(
        &self,
        Parameters(params): Parameters<EvaluateSnapshotsParams>,
    ) -> Result<Json<SnapshotsResponse>, String> {
        params
            .validate()
            .map_err(|e| format!("Validation error: {e}"))?;
        let config =
            tools::evaluation_config(self.source.as_ref(), &self.config, &params.options, None)
                .map_err(|e| format!("Error: {e}"))?;
        config
            .validate()
            .map_err(|e| format!("Validation error: {e}"))?;

        Ok(Json(tools::snapshots::execute(
            &params.legs,
            params.spot_price,
            &config,
        )))
    }

    /// Per-leg P&L contributions at a single underlying price.
    ///
    /// **Workflow Phase**: 3/3 (inspection)
    /// **When to use**: To explain one point of the curve, e.g. at a breakeven
    /// **Prerequisites**: Legs
    /// **Next tool**: evaluate_payoff after adjusting legs
    #[tool(name = "payoff_breakdown")]
    async fn payoff_breakdown(
        &self,
        Parameters(params): Parameters<PayoffBreakdownParams>,
    ) -> Result<Json<BreakdownResponse>, String> {
        params
            .validate()
            .map_err(|e| format!("Validation error: {e}"))?;
        let config = tools::evaluation_config(
            self.source.as_ref(),
            &self.config,
            &params.options,
            params.snapshot_expiry,
        )
        .map_err(|e| format!("Error: {e}"))?;

        Ok(Json(tools::breakdown::execute(
            &params.legs,
            params.price,
            &config,
        )))
    }

    /// Browse all 18 built-in strategy templates grouped by category.
    ///
    /// **Workflow Phase**: 1a/3 (exploration)
    /// **When to use**: To choose a template for build_strategy
    /// **Prerequisites**: None
    /// **Categories**: Singles, Spreads, Butterflies, Iron, Calendar
    /// **Next tool**: build_strategy
    #[tool(name = "list_strategies")]
    async fn list_strategies(&self) -> Json<StrategiesResponse> {
        Json(tools::strategies::execute())
    }

    /// Build a strategy template into concrete legs priced from the option chain.
    ///
    /// **Workflow Phase**: 1b/3 (construction)
    /// **When to use**: To start from a named strategy instead of hand-written legs
    /// **Prerequisites**: Strategy name from list_strategies, instrument from list_instruments
    /// **Next tools**: evaluate_payoff (tweak legs), evaluate_snapshots (calendars)
    ///
    /// Strikes are placed in strike intervals around ATM; premiums are the
    /// chain's last traded prices. Pass `seed` for reproducible quotes.
    #[tool(name = "build_strategy")]
    async fn build_strategy(
        &self,
        Parameters(params): Parameters<BuildStrategyParams>,
    ) -> Result<Json<BuildStrategyResponse>, String> {
        params
            .validate()
            .map_err(|e| format!("Validation error: {e}"))?;
        let req = BuildRequest {
            strategy: params.strategy,
            instrument: params.instrument,
            expiry: params.expiry,
            far_expiry: params.far_expiry,
            quantity: params.quantity.unwrap_or(1),
            lot_size: params.lot_size,
            as_of: params.as_of,
            seed: params.seed,
            sample_points: self.config.sample_points,
        };

        tools::build::execute(
            self.source.as_ref(),
            &self.cache,
            self.config.default_lot_size,
            &req,
        )
        .map(Json)
        .map_err(|e| format!("Error: {e}"))
    }

    /// List the available underlyings with spot, lot size, strike interval and expiries.
    ///
    /// **Workflow Phase**: 0 (exploration)
    /// **When to use**: Before build_strategy or get_option_chain
    /// **Prerequisites**: None
    #[tool(name = "list_instruments")]
    async fn list_instruments(&self) -> Json<InstrumentsResponse> {
        Json(tools::instruments::execute(self.source.as_ref()))
    }

    /// Option chain for an instrument: 15 strikes around ATM per expiry.
    ///
    /// **Workflow Phase**: 0b (exploration)
    /// **When to use**: To inspect premiums, IV, volume and open interest
    /// **Prerequisites**: Instrument from list_instruments
    /// **Next tools**: build_strategy, or evaluate_payoff with available_strikes
    #[tool(name = "get_option_chain")]
    async fn get_option_chain(
        &self,
        Parameters(params): Parameters<OptionChainParams>,
    ) -> Result<Json<OptionChainResponse>, String> {
        params
            .validate()
            .map_err(|e| format!("Validation error: {e}"))?;
        tools::chain::execute(
            self.source.as_ref(),
            &params.instrument,
            params.expiry,
            params.as_of,
            params.seed,
        )
        .map(Json)
        .map_err(|e| format!("Error: {e}"))
    }

    /// Open interest totals, put/call ratio and sentiment across all expiries.
    ///
    /// **Workflow Phase**: 0c (exploration)
    /// **When to use**: To pick a directional or neutral template
    /// **Prerequisites**: Instrument from list_instruments
    /// **Next tool**: list_strategies
    #[tool(name = "market_summary")]
    async fn market_summary(
        &self,
        Parameters(params): Parameters<MarketSummaryParams>,
    ) -> Result<Json<MarketSummaryResponse>, String> {
        params
            .validate()
            .map_err(|e| format!("Validation error: {e}"))?;
        tools::market::execute(
            self.source.as_ref(),
            &params.instrument,
            params.as_of,
            params.seed,
        )
        .map(Json)
        .map_err(|e| format!("Error: {e}"))
    }

    /// Open a simulated option position at the chain's last traded price.
    ///
    /// **Workflow Phase**: 4 (paper trading)
    /// **When to use**: To follow a position over time without real orders
    /// **Prerequisites**: A strike and expiry listed by get_option_chain
    /// **Next tools**: list_paper_positions (with a later as_of), close_paper_trade
    ///
    /// P&L is (current - entry) x quantity, negated for SELL. Positions live
    /// only as long as the server process.
    #[tool(name = "open_paper_trade")]
    async fn open_paper_trade(
        &self,
        Parameters(params): Parameters<OpenPaperTradeParams>,
    ) -> Result<Json<PaperTradeResponse>, String> {
        params
            .validate()
            .map_err(|e| format!("Validation error: {e}"))?;
        let order = OpenOrder {
            instrument: params.instrument,
            strike: params.strike,
            expiry: params.expiry,
            option_type: params.option_type,
            action: params.action,
            quantity: params.quantity.unwrap_or(1),
        };

        tools::paper::execute_open(
            self.source.as_ref(),
            &self.ledger,
            &order,
            params.as_of,
            params.seed,
        )
        .map(Json)
        .map_err(|e| format!("Error: {e}"))
    }

    /// Open paper positions, closed history and P&L totals.
    ///
    /// **Workflow Phase**: 4 (paper trading)
    /// **When to use**: To check how open positions are doing
    /// **Prerequisites**: None
    /// **Next tool**: close_paper_trade
    ///
    /// With `as_of`, every open position is repriced against that day's chain first.
    #[tool(name = "list_paper_positions")]
    async fn list_paper_positions(
        &self,
        Parameters(params): Parameters<ListPaperPositionsParams>,
    ) -> Result<Json<PortfolioResponse>, String> {
        params
            .validate()
            .map_err(|e| format!("Validation error: {e}"))?;
        tools::paper::execute_list(
            self.source.as_ref(),
            &self.ledger,
            params.as_of,
            params.seed,
        )
        .map(Json)
        .map_err(|e| format!("Error: {e}"))
    }

    /// Close an open paper position and move it to the history.
    ///
    /// **Workflow Phase**: 4 (paper trading)
    /// **When to use**: To lock in a position's P&L
    /// **Prerequisites**: Position id from open_paper_trade or list_paper_positions
    /// **Next tool**: list_paper_positions
    #[tool(name = "close_paper_trade")]
    async fn close_paper_trade(
        &self,
        Parameters(params): Parameters<ClosePaperTradeParams>,
    ) -> Result<Json<PaperTradeResponse>, String> {
        params
            .validate()
            .map_err(|e| format!("Validation error: {e}"))?;
        tools::paper::execute_close(
            self.source.as_ref(),
            &self.ledger,
            &params.id,
            params.as_of,
            params.seed,
        )
        .map(Json)
        .map_err(|e| format!("Error: {e}"))
    }
}

#[tool_handler]
impl ServerHandler for PayoffServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: rmcp::model::ProtocolVersion::default(),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "payoff-mcp".into(),
                title: None,
                version: "0.1.0".into(),
                description: None,
                icons: None,
                website_url: None,
            },
            instructions: Some(
                "Options payoff and risk engine for multi-leg positions. \
                \n\nRecommended workflow:\
                \n0. list_instruments() — underlyings with spot, lot size and expiries. \
                get_option_chain({ instrument, expiry?, as_of?, seed? }) and \
                market_summary({ instrument }) show the chain and put/call ratio.\
                \n1. list_strategies() then build_strategy({ strategy, instrument, expiry?, \
                far_expiry?, quantity?, seed? }) — turn a template into priced legs.\
                \n2. evaluate_payoff({ legs, spot_price, lot_size?, instrument?, view_mode?, \
                snapshot_expiry?, zoom?, sample_points?, available_strikes? }) — P&L curve, \
                breakevens, probability of profit, max profit/loss, P&L at spot and margin. \
                Legs: { strike, optionType: CALL|PUT|CE|PE, action: BUY|SELL, premium, \
                quantity, expiry? }.\
                \n2b. evaluate_snapshots({ legs, spot_price, ... }) — one evaluation per expiry.\
                \n3. payoff_breakdown({ legs, price }) — per-leg contributions at one price.\
                \n4. open_paper_trade({ instrument, strike, expiry, option_type, action, \
                quantity? }), list_paper_positions({ as_of? }) and close_paper_trade({ id }) \
                — simulated positions marked to market against the option chain.\
                \n\nValues are at expiry (intrinsic only). Margin is an approximation that \
                recognizes credit-spread hedges, not an exchange margin figure."
                    .into(),
            ),
        }
    }
}

/// Axum app serving the MCP endpoint at `/mcp` and a liveness check at `/health`.
pub fn http_app(server: PayoffServer) -> axum::Router {
    use rmcp::transport::streamable_http_server::{
        session::local::LocalSessionManager, StreamableHttpServerConfig, StreamableHttpService,
    };

    let service = StreamableHttpService::new(
        move || Ok(server.clone()),
        LocalSessionManager::default().into(),
        StreamableHttpServerConfig::default(),
    );

    axum::Router::new()
        .nest_service("/mcp", service)
        .route("/health", axum::routing::get(|| async { "ok" }))
        .layer(tower_http::cors::CorsLayer::permissive())
}
