use fair_rotation::prelude::*;

/// Generates a schedule configured from `ROTATION_*` environment variables and prints it.
fn main() -> anyhow::Result<()> {
    let config = Configuration::from_env()?;
    let schedule = generate(&config)?;

    println!("matches");
    for m in schedule.matches() {
        match m.benched {
            Some(benched) => println!("match {:>3}: {} (bench: {benched})", m.index, m.chain),
            None => println!("match {:>3}: {}", m.index, m.chain),
        }
    }
    println!();

    println!("teammate: ");
    print!("{}", schedule.teammates());
    println!();
    println!("opp: ");
    print!("{}", schedule.opponents());
    println!();

    println!(
        "dispersion: teammate {:.3}, opp {:.3}",
        schedule.teammate_dispersion(),
        schedule.opponent_dispersion()
    );
    Ok(())
}
