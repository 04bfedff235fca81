/// Data ingest clients for the external reading collaborators.
///
/// Everything in this tree is I/O. The engine never calls into it — ingest
/// produces `Reading` sets and hands them to the assembler, so retries,
/// timeouts, and API quirks stay on this side of the boundary.
///
/// Submodules:
/// - `weatherapi` — WeatherAPI.com current-conditions client (rainfall, wind).

pub mod weatherapi;
