use relax_driver::app::run;

fn main() -> color_eyre::Result<()> {
    run::<f64>()
}
