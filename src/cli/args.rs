// args.rs - Command line arguments definition

use argh::FromArgs;

#[derive(FromArgs, Debug)]
/// pani - Parallel pairwise ANI matrices with dnadiff
pub struct Args {
    /// path to TOML configuration file
    #[argh(option)]
    pub config: Option<String>,

    /// print a sample configuration file and exit
    #[argh(switch)]
    pub generate_config: bool,

    #[argh(subcommand)]
    pub command: Option<Command>,
}

#[derive(FromArgs, Debug)]
#[argh(subcommand)]
pub enum Command {
    Matrix(MatrixArgs),
    Ref(RefArgs),
}

#[derive(FromArgs, Debug)]
/// compare every genome of one folder against every other
#[argh(subcommand, name = "matrix")]
pub struct MatrixArgs {
    /// input folder (default: ./)
    #[argh(option, short = 'f')]
    pub folder: Option<String>,

    /// output matrix file (default: ani.tsv)
    #[argh(option, short = 'o')]
    pub out: Option<String>,

    /// number of parallel comparisons (default: 10)
    #[argh(option, short = 't')]
    pub threads: Option<usize>,

    /// input file extension (default: fasta)
    #[argh(option, short = 'e')]
    pub ext: Option<String>,

    /// write distances (100 - identity) instead of identities
    #[argh(switch, short = 'd')]
    pub distance: bool,

    /// log file (default: run.log)
    #[argh(option, short = 'l')]
    pub logfile: Option<String>,

    /// output format: tsv, csv, phylip (default: tsv)
    #[argh(option)]
    pub format: Option<String>,

    /// fixed number of decimals in the output (default: shortest exact)
    #[argh(option)]
    pub precision: Option<usize>,

    /// comparison program (default: dnadiff)
    #[argh(option)]
    pub tool: Option<String>,

    /// extra argument passed to the comparison program (repeatable)
    #[argh(option)]
    pub tool_arg: Vec<String>,

    /// per-comparison timeout in seconds, 0 disables (default: 3600)
    #[argh(option)]
    pub timeout: Option<u64>,

    /// directory for temporary comparison folders (default: .)
    #[argh(option)]
    pub work_dir: Option<String>,

    /// read the score from this one-based report line
    #[argh(option)]
    pub report_line: Option<usize>,

    /// read the score from the report line starting with this key (default: AvgIdentity)
    #[argh(option)]
    pub report_key: Option<String>,

    /// one-based whitespace column holding the score (default: 2)
    #[argh(option)]
    pub report_column: Option<usize>,

    /// keep only genomes whose name matches this regex
    #[argh(option)]
    pub include: Option<String>,

    /// drop genomes whose name matches this regex
    #[argh(option)]
    pub exclude: Option<String>,

    /// run every comparison and report all failures at the end
    #[argh(switch)]
    pub keep_going: bool,

    /// write NA for failed comparisons instead of aborting
    #[argh(switch)]
    pub allow_partial: bool,

    /// keep temporary comparison folders
    #[argh(switch)]
    pub keep_temp: bool,

    /// disable the progress bar
    #[argh(switch)]
    pub no_progress: bool,

    /// plan the comparisons and exit without running them
    #[argh(switch)]
    pub dry_run: bool,
}

#[derive(FromArgs, Debug)]
/// compare every query genome against every reference genome
#[argh(subcommand, name = "ref")]
pub struct RefArgs {
    /// reference folder
    #[argh(option, short = 'r')]
    pub reference: Option<String>,

    /// query folder
    #[argh(option, short = 'q')]
    pub query: Option<String>,

    /// output matrix file (default: ani.tsv)
    #[argh(option, short = 'o')]
    pub out: Option<String>,

    /// number of parallel comparisons (default: 10)
    #[argh(option, short = 't')]
    pub threads: Option<usize>,

    /// input file extension (default: fasta)
    #[argh(option, short = 'e')]
    pub ext: Option<String>,

    /// write distances (100 - identity) instead of identities
    #[argh(switch, short = 'd')]
    pub distance: bool,

    /// log file (default: run.log)
    #[argh(option, short = 'l')]
    pub logfile: Option<String>,

    /// output format: tsv, csv, phylip (default: tsv)
    #[argh(option)]
    pub format: Option<String>,

    /// fixed number of decimals in the output (default: shortest exact)
    #[argh(option)]
    pub precision: Option<usize>,

    /// comparison program (default: dnadiff)
    #[argh(option)]
    pub tool: Option<String>,

    /// extra argument passed to the comparison program (repeatable)
    #[argh(option)]
    pub tool_arg: Vec<String>,

    /// per-comparison timeout in seconds, 0 disables (default: 3600)
    #[argh(option)]
    pub timeout: Option<u64>,

    /// directory for temporary comparison folders (default: .)
    #[argh(option)]
    pub work_dir: Option<String>,

    /// read the score from this one-based report line
    #[argh(option)]
    pub report_line: Option<usize>,

    /// read the score from the report line starting with this key (default: AvgIdentity)
    #[argh(option)]
    pub report_key: Option<String>,

    /// one-based whitespace column holding the score (default: 2)
    #[argh(option)]
    pub report_column: Option<usize>,

    /// keep only genomes whose name matches this regex
    #[argh(option)]
    pub include: Option<String>,

    /// drop genomes whose name matches this regex
    #[argh(option)]
    pub exclude: Option<String>,

    /// run every comparison and report all failures at the end
    #[argh(switch)]
    pub keep_going: bool,

    /// write NA for failed comparisons instead of aborting
    #[argh(switch)]
    pub allow_partial: bool,

    /// keep temporary comparison folders
    #[argh(switch)]
    pub keep_temp: bool,

    /// disable the progress bar
    #[argh(switch)]
    pub no_progress: bool,

    /// plan the comparisons and exit without running them
    #[argh(switch)]
    pub dry_run: bool,
}

/// Input folders as given on the command line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputArgs {
    Matrix { folder: Option<String> },
    Ref { reference: Option<String>, query: Option<String> },
}

/// Options common to both subcommands, before defaults are applied
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SharedArgs {
    pub out: Option<String>,
    pub threads: Option<usize>,
    pub ext: Option<String>,
    pub distance: bool,
    pub logfile: Option<String>,
    pub format: Option<String>,
    pub precision: Option<usize>,
    pub tool: Option<String>,
    pub tool_args: Vec<String>,
    pub timeout: Option<u64>,
    pub work_dir: Option<String>,
    pub report_line: Option<usize>,
    pub report_key: Option<String>,
    pub report_column: Option<usize>,
    pub include: Option<String>,
    pub exclude: Option<String>,
    pub keep_going: bool,
    pub allow_partial: bool,
    pub keep_temp: bool,
    pub no_progress: bool,
    pub dry_run: bool,
}

/// A parsed subcommand split into its inputs and the shared options
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub inputs: InputArgs,
    pub shared: SharedArgs,
}

impl From<MatrixArgs> for Invocation {
    fn from(a: MatrixArgs) -> Self {
        Invocation {
            inputs: InputArgs::Matrix { folder: a.folder },
            shared: SharedArgs {
                out: a.out,
                threads: a.threads,
                ext: a.ext,
                distance: a.distance,
                logfile: a.logfile,
                format: a.format,
                precision: a.precision,
                tool: a.tool,
                tool_args: a.tool_arg,
                timeout: a.timeout,
                work_dir: a.work_dir,
                report_line: a.report_line,
                report_key: a.report_key,
                report_column: a.report_column,
                include: a.include,
                exclude: a.exclude,
                keep_going: a.keep_going,
                allow_partial: a.allow_partial,
                keep_temp: a.keep_temp,
                no_progress: a.no_progress,
                dry_run: a.dry_run,
            },
        }
    }
}

impl From<RefArgs> for Invocation {
    fn from(a: RefArgs) -> Self {
        Invocation {
            inputs: InputArgs::Ref {
                reference: a.reference,
                query: a.query,
            },
            shared: SharedArgs {
                out: a.out,
                threads: a.threads,
                ext: a.ext,
                distance: a.distance,
                logfile: a.logfile,
                format: a.format,
                precision: a.precision,
                tool: a.tool,
                tool_args: a.tool_arg,
                timeout: a.timeout,
                work_dir: a.work_dir,
                report_line: a.report_line,
                report_key: a.report_key,
                report_column: a.report_column,
                include: a.include,
                exclude: a.exclude,
                keep_going: a.keep_going,
                allow_partial: a.allow_partial,
                keep_temp: a.keep_temp,
                no_progress: a.no_progress,
                dry_run: a.dry_run,
            },
        }
    }
}

impl From<Command> for Invocation {
    fn from(command: Command) -> Self {
        match command {
            Command::Matrix(a) => a.into(),
            Command::Ref(a) => a.into(),
        }
    }
}
