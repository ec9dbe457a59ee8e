//! Static ASCII art describing the swarm architecture.

use std::io::{self, Write};

const ARCHITECTURE: &str = r#"
    ┌─────────────────────────────────────────────────────────────┐
    │                🚀 Aprio Swarm System                       │
    │              High-Performance Distributed Workers           │
    └─────────────────────────────────────────────────────────────┘

    ┌─────────────┐    ┌─────────────────┐    ┌─────────────────┐
    │   Client    │───▶│  Coordinator    │───▶│   Task Queue    │
    │             │    │                 │    │                 │
    └─────────────┘    └─────────────────┘    └─────────────────┘
                                │
                                ▼
    ┌─────────────────────────────────────────────────────────────┐
    │                    👥 Worker Pool                           │
    │                                                             │
    │  ┌─────────────┐  ┌─────────────┐  ┌─────────────┐        │
    │  │ 📄 Document │  │ 🧠 ML       │  │ 🔍 Vector   │        │
    │  │ Processor   │  │ Inference   │  │ Indexer     │        │
    │  │ Worker 1    │  │ Worker 2    │  │ Worker N    │        │
    │  └─────────────┘  └─────────────┘  └─────────────┘        │
    └─────────────────────────────────────────────────────────────┘
                                │
                                ▼
    ┌─────────────────────────────────────────────────────────────┐
    │                  ⚡ Task Processing                         │
    │                                                             │
    │  📢 Echo Tasks (100ms)    🧮 Compute Tasks (200ms)        │
    │  ❌ Error Tasks (50ms)    📝 Custom Tasks (varies)        │
    └─────────────────────────────────────────────────────────────┘
                                │
                                ▼
    ┌─────────────────────────────────────────────────────────────┐
    │                  📊 Result Collection                       │
    │                                                             │
    │  ✅ Success: 4/5 tasks    ❌ Failed: 1/5 tasks            │
    │  ⏱️  Avg Time: 118ms      📈 Throughput: 42 tasks/sec     │
    └─────────────────────────────────────────────────────────────┘

    🎯 Performance Goals:
    • Throughput: 10,000+ documents/second
    • Latency: Sub-10ms response times
    • Scalability: Linear scaling across nodes
    • Efficiency: Minimal resource overhead

    🔄 Real-time Flow:
    Client → Coordinator → Task Queue → Workers → Processing → Results
"#;

const TASK_FLOW: &str = r#"
    📋 Task Processing Flow:
    ═══════════════════════════════════════════════════════════════

    1. 📤 Task Submission
       Client submits tasks to SwarmCoordinator
       └─ Tasks queued with priority levels

    2. 🔄 Task Distribution
       Coordinator distributes tasks to available workers
       └─ Round-robin load balancing

    3. ⚡ Worker Processing
       Workers process tasks concurrently
       └─ Different task types have different processing times

    4. 📊 Result Collection
       Results sent back to coordinator
       └─ Success/failure tracking and metrics

    5. ✅ Completion
       All tasks processed and results reported
       └─ Performance metrics calculated

    🎯 Example Execution:
    ┌─────────────────────────────────────────────────────────────┐
    │ Task 1 (Echo)    → Worker 1 → 102ms → ✅ Success           │
    │ Task 2 (Compute) → Worker 2 → 200ms → ✅ Success           │
    │ Task 3 (Echo)    → Worker 1 → 101ms → ✅ Success           │
    │ Task 4 (Error)   → Worker 1 →  50ms → ❌ Failed            │
    │ Task 5 (Compute) → Worker 2 → 200ms → ✅ Success           │
    └─────────────────────────────────────────────────────────────┘
"#;

/// Plain variant printed ahead of the performance charts
const COMPACT_ARCHITECTURE: &str = r#"
    ┌─────────────────────────────────────────────────────────────┐
    │                Living Twin Swarm System                     │
    └─────────────────────────────────────────────────────────────┘

    ┌─────────────┐    ┌─────────────────┐    ┌─────────────────┐
    │   Client    │───▶│  Coordinator    │───▶│   Task Queue    │
    │             │    │                 │    │                 │
    └─────────────┘    └─────────────────┘    └─────────────────┘
                                │
                                ▼
    ┌─────────────────────────────────────────────────────────────┐
    │                    Worker Pool                              │
    │                                                             │
    │  ┌─────────────┐  ┌─────────────┐  ┌─────────────┐        │
    │  │ Document    │  │ ML          │  │ Vector      │        │
    │  │ Processor   │  │ Inference   │  │ Indexer     │        │
    │  │ Worker 1    │  │ Worker 2    │  │ Worker N    │        │
    │  └─────────────┘  └─────────────┘  └─────────────┘        │
    └─────────────────────────────────────────────────────────────┘
                                │
                                ▼
    ┌─────────────────────────────────────────────────────────────┐
    │                  Task Processing                            │
    │                                                             │
    │  📢 Echo Tasks (100ms)    🧮 Compute Tasks (200ms)        │
    │  ❌ Error Tasks (50ms)    📝 Custom Tasks (varies)        │
    └─────────────────────────────────────────────────────────────┘
                                │
                                ▼
    ┌─────────────────────────────────────────────────────────────┐
    │                  Result Collection                          │
    │                                                             │
    │  ✅ Success: 4/5 tasks    ❌ Failed: 1/5 tasks            │
    │  ⏱️  Avg Time: 118ms      📊 Throughput: 42 tasks/sec     │
    └─────────────────────────────────────────────────────────────┘
"#;

/// Boxed system architecture with performance goals
pub fn architecture_diagram() -> &'static str {
    ARCHITECTURE
}

/// Step-by-step task processing flow with an example run
pub fn task_flow() -> &'static str {
    TASK_FLOW
}

pub fn compact_architecture() -> &'static str {
    COMPACT_ARCHITECTURE
}

/// Write the full ASCII report: banner, architecture, then task flow
pub fn write_ascii_report<W: Write>(out: &mut W) -> io::Result<()> {
    writeln!(out, "🎨 Aprio Swarm System - ASCII Diagrams")?;
    writeln!(out, "{}", "=".repeat(60))?;
    writeln!(out, "{}", architecture_diagram())?;
    writeln!(out, "\n")?;
    writeln!(out, "{}", task_flow())?;
    Ok(())
}
