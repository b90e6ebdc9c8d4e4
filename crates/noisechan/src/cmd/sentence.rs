use noisechan_node::{format_sentence, make_sentence, Corpus, WordCountRange};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::cmd::SentenceArgs;
use crate::exit::{node_error, CliResult, SUCCESS};
use crate::output::{print_sentence, OutputFormat};

pub fn run(args: SentenceArgs, format: OutputFormat) -> CliResult<i32> {
    let range = match args.words[..] {
        [low, high] => WordCountRange::new(low, high),
        _ => Ok(WordCountRange::default()),
    }
    .map_err(|err| node_error("invalid -w", err))?;

    let corpus = Corpus::load(&args.corpus).map_err(|err| node_error("corpus", err))?;
    let seed = args.seed.unwrap_or_else(rand::random);
    let mut rng = ChaCha8Rng::seed_from_u64(seed);

    let sentence = format_sentence(&make_sentence(&mut rng, range, &corpus));
    print_sentence(&sentence, seed, format);
    Ok(SUCCESS)
}
