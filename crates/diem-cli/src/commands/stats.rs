//! Report commands: dashboard stats, streaks, finance and overview

use anyhow::Result;
use diem_core::db::Database;
use diem_core::insights::Severity;
use diem_core::models::FinanceEntry;
use diem_core::stats::{streaks_for, CategoryShare};
use diem_core::{
    build_overview, compute_dashboard_stats, compute_finance_summary, daily_samples,
    DashboardStats, FinanceSummary, PeriodMode, RecordStore,
};

use super::today;

fn fmt_opt(value: Option<f64>) -> String {
    value
        .map(|v| format!("{:.1}", v))
        .unwrap_or_else(|| "-".to_string())
}

fn severity_icon(severity: Severity) -> &'static str {
    match severity {
        Severity::Warning => "🔴",
        Severity::Attention => "🟡",
        Severity::Info => "🟢",
    }
}

/// Compute dashboard statistics for a user
pub fn dashboard_for(
    db: &Database,
    user: &str,
    period: &str,
    from: Option<&str>,
    to: Option<&str>,
) -> Result<DashboardStats> {
    let mode = PeriodMode::parse(period, from, to)?;
    let snapshot = db.snapshot(user)?;
    let samples = daily_samples(
        &snapshot.sleep,
        &snapshot.study,
        &snapshot.mood,
        &snapshot.water,
    );
    Ok(compute_dashboard_stats(&samples, mode, today()))
}

pub fn cmd_stats(
    db: &Database,
    user: &str,
    period: &str,
    from: Option<&str>,
    to: Option<&str>,
) -> Result<()> {
    let stats = dashboard_for(db, user, period, from, to)?;

    println!(
        "📈 Dashboard: {} ({} to {})",
        stats.period, stats.start, stats.end
    );
    println!("   Days with data: {}", stats.days_with_data);
    println!();
    println!("   Average sleep:  {} h", fmt_opt(stats.averages.sleep));
    println!("   Average study:  {} h", fmt_opt(stats.averages.study));
    println!("   Average mood:   {} /10", fmt_opt(stats.averages.mood));
    println!("   Average water:  {} glasses", fmt_opt(stats.averages.water));

    if !stats.days.is_empty() {
        println!();
        println!("   {:<12} {:>6} {:>6} {:>6} {:>6}", "Day", "Sleep", "Study", "Mood", "Water");
        for sample in &stats.days {
            let date = sample.date.map(|d| d.to_string()).unwrap_or_default();
            println!(
                "   {:<12} {:>6} {:>6} {:>6} {:>6}",
                date,
                fmt_opt(sample.sleep),
                fmt_opt(sample.study),
                fmt_opt(sample.mood),
                fmt_opt(sample.water)
            );
        }
    }

    if stats.days_with_data > 0 {
        println!();
        println!(
            "   Time split: {:.1} h sleep, {:.1} h study, {:.1} h free",
            stats.activity.sleep_hours, stats.activity.study_hours, stats.activity.free_hours
        );
    }

    println!();
    println!("💡 Insights");
    for insight in &stats.insights {
        println!("   {} {}", severity_icon(insight.severity), insight.message);
    }

    Ok(())
}

pub fn cmd_streaks(db: &Database, user: &str) -> Result<()> {
    let snapshot = db.snapshot(user)?;
    let today = today();

    let gratitude = streaks_for(&snapshot.gratitude, today);
    let reflection = streaks_for(&snapshot.reflections, today);

    println!("🔥 Streaks (current / longest)");
    println!();
    println!(
        "   {:<24} {:>3} / {}",
        "Gratitude journal", gratitude.current, gratitude.longest
    );
    println!(
        "   {:<24} {:>3} / {}",
        "Reflection", reflection.current, reflection.longest
    );

    let overview = build_overview(&snapshot, PeriodMode::week(), today);
    for habit in &overview.habits {
        println!(
            "   {:<24} {:>3} / {}{}",
            super::truncate(&habit.name, 24),
            habit.current,
            habit.longest,
            if habit.completed_today { "  ✓" } else { "" }
        );
    }

    Ok(())
}

fn print_shares(title: &str, shares: &[CategoryShare]) {
    if shares.is_empty() {
        return;
    }
    println!();
    println!("   {}", title);
    for share in shares {
        println!(
            "     {:<16} {:>10.2}  {:>5.1}%",
            share.category, share.amount, share.percentage
        );
    }
}

/// Finance summary for a user; no period arguments means the whole history
pub fn finance_for(
    db: &Database,
    user: &str,
    period: Option<&str>,
    from: Option<&str>,
    to: Option<&str>,
) -> Result<FinanceSummary> {
    let mode = match (period, from, to) {
        (None, None, None) => None,
        (period, from, to) => Some(PeriodMode::parse(period.unwrap_or("month"), from, to)?),
    };
    let entries: Vec<FinanceEntry> = db
        .list::<FinanceEntry>(user)?
        .into_iter()
        .map(|s| s.record)
        .collect();
    Ok(compute_finance_summary(&entries, mode, today()))
}

pub fn cmd_finance(
    db: &Database,
    user: &str,
    period: Option<&str>,
    from: Option<&str>,
    to: Option<&str>,
) -> Result<()> {
    let summary = finance_for(db, user, period, from, to)?;

    println!("💰 Finance: {} ({} entries)", summary.period, summary.entries);
    println!();
    println!("   Income:   {:>10.2}", summary.total_income);
    println!("   Expenses: {:>10.2}", summary.total_expense);
    println!("   Balance:  {:>10.2}", summary.balance);

    print_shares("Expenses by category", &summary.expense_by_category);
    print_shares("Income by category", &summary.income_by_category);

    if !summary.monthly.is_empty() {
        println!();
        println!("   {:<8} {:>10} {:>10}", "Month", "Income", "Expense");
        for month in &summary.monthly {
            println!(
                "   {:<8} {:>10.2} {:>10.2}",
                month.month, month.income, month.expense
            );
        }
    }

    Ok(())
}

pub fn cmd_overview(db: &Database, user: &str, period: &str) -> Result<()> {
    let mode = PeriodMode::parse(period, None, None)?;
    let snapshot = db.snapshot(user)?;
    let overview = build_overview(&snapshot, mode, today());

    println!("🗓  Overview: {}", overview.period);
    println!();
    println!(
        "   Habits:      {} tracked, {} done today",
        overview.habits.len(),
        overview.habits.iter().filter(|h| h.completed_today).count()
    );
    println!(
        "   Tasks:       {} pending, {} overdue, {} completed",
        overview.tasks.pending, overview.tasks.overdue, overview.tasks.completed
    );
    println!(
        "   Water today: {}/{} glasses ({:.0}%)",
        overview.water_today.glasses,
        overview.water_today.goal,
        overview.water_today.progress_percent
    );
    println!(
        "   Sleep:       {} h avg, quality {} /5",
        fmt_opt(overview.average_sleep),
        fmt_opt(overview.average_sleep_quality)
    );
    println!("   Study:       {:.1} h total", overview.total_study_hours);
    println!("   Mood:        {} /10 avg", fmt_opt(overview.average_mood));
    println!(
        "   Meals:       {} kcal avg, {:.0} kcal total",
        fmt_opt(overview.average_meal_calories),
        overview.total_meal_calories
    );
    println!(
        "   Fitness:     {} sessions, {:.0} min, {:.0} kcal",
        overview.fitness.sessions, overview.fitness.minutes, overview.fitness.calories
    );
    println!(
        "   Gratitude:   {} entries, {} day streak",
        overview.gratitude.entries, overview.gratitude.streak.current
    );
    println!(
        "   Reflection:  {} entries, {:.1} avg rating, {} goals achieved",
        overview.reflection.entries,
        overview.reflection.average_rating,
        overview.reflection.goals_achieved
    );
    println!(
        "   Calendar:    {} upcoming, {} completed",
        overview.upcoming_events, overview.completed_events
    );
    println!(
        "   Balance:     {:.2}",
        overview.finance.balance
    );

    print_shares("Study by subject (hours)", &overview.study_by_subject);

    Ok(())
}
