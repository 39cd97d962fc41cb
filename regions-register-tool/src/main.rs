use anyhow::{Context, Result};
use arbitrary::Unstructured;
use clap::Parser;
use rand::RngCore;
use regions_register::debug_utils::{self, ArbitraryOpsConfig, DisplayRegister, RegisterOp};
use regions_register::{Options, RegionsRegister};

#[derive(Parser)]
/// Tool for testing regions-register.
enum Args {
    /// Replay random operation scripts and check them against the reference
    /// model.
    Stress {
        /// Print each script and the final register contents.
        #[clap(short = 'v')]
        verbose: bool,

        /// Number of scripts to run.
        #[clap(long, default_value_t = 1000)]
        iterations: usize,

        /// Script generation parameters.
        #[clap(flatten)]
        gen_args: GenArgs,

        /// Register options.
        #[clap(flatten)]
        options: Options,
    },

    /// Generate a random operation script.
    GenOps {
        /// Script generation parameters.
        #[clap(flatten)]
        gen_args: GenArgs,
    },
}

#[derive(clap::Args)]
struct GenArgs {
    /// Maximum number of operations per script.
    #[clap(long, default_value_t = 64)]
    num_ops: usize,

    /// Maximum number of distinct region labels per script.
    #[clap(long, default_value_t = 8)]
    num_labels: usize,

    /// Maximum number of labels drawn for each area.
    #[clap(long, default_value_t = 4)]
    labels_per_area: usize,
}

impl GenArgs {
    fn gen_ops(&self) -> Result<Vec<RegisterOp>> {
        let config = ArbitraryOpsConfig {
            num_ops: 0..=self.num_ops,
            num_labels: 1..=self.num_labels.max(1),
            labels_per_area: 1..=self.labels_per_area.max(1),
            ..Default::default()
        };
        let mut bytes = [0; 4096];
        rand::rng().fill_bytes(&mut bytes);
        debug_utils::arbitrary_ops_with_config(&mut Unstructured::new(&bytes), config)
            .context("failed to generate arbitrary script")
    }
}

fn print_script(ops: &[RegisterOp]) {
    for op in ops {
        println!("{op}");
    }
}

fn main() -> Result<()> {
    pretty_env_logger::init();
    let args = Args::parse();

    match args {
        Args::Stress {
            verbose,
            iterations,
            ref gen_args,
            ref options,
        } => {
            let mut total_ops = 0;
            for iteration in 0..iterations {
                let ops = gen_args.gen_ops()?;
                total_ops += ops.len();

                if verbose {
                    println!("================ Script {iteration} ================");
                    print_script(&ops);
                }

                if let Err(err) = debug_utils::check_ops(options, &ops) {
                    if !verbose {
                        println!("================ Failing script ================");
                        print_script(&ops);
                    }
                    return Err(err.context(format!("script {iteration} failed the checker")));
                }

                if verbose {
                    let mut register = RegionsRegister::with_options(options.clone());
                    for op in &ops {
                        op.apply(&mut register);
                    }
                    println!("================ Register ================");
                    print!("{}", DisplayRegister(&register));
                    println!("{}", register.stats());
                }
            }
            println!("Checked {iterations} scripts ({total_ops} operations)");
        }
        Args::GenOps { ref gen_args } => {
            let ops = gen_args.gen_ops()?;
            print_script(&ops);
        }
    }
    Ok(())
}
