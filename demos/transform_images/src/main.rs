use argh::FromArgs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use imwarp::image::{Image, ImageSize};
use imwarp::imgproc::{
    ops,
    transform::{Axis, Dimensions, Translation},
    WarpError,
};
use imwarp::io::functional::{self as F, GenericImage};

// homographies used to check the projection warp
const PRESETS: [[[f64; 3]; 3]; 4] = [
    [[1.0, 0.4, 0.4], [0.1, 1.0, 0.3], [0.0, 0.0, 1.0]],
    [[2.1, -0.35, 1.0], [-0.3, 0.7, 0.3], [0.0, 0.0, 1.0]],
    [[0.8, 0.2, 0.3], [-0.1, 0.9, -0.1], [0.0005, -0.0005, 1.0]],
    [[29.25, 13.95, 20.25], [4.95, 35.55, 9.45], [0.045, 0.09, 45.0]],
];

#[derive(Debug, Clone, Copy, PartialEq)]
enum Op {
    Scale,
    Reflect,
    Rotate,
    Shear,
    Translate,
    Projection,
}

impl Op {
    fn name(&self) -> &'static str {
        match self {
            Op::Scale => "scale",
            Op::Reflect => "reflect",
            Op::Rotate => "rotate",
            Op::Shear => "shear",
            Op::Translate => "translate",
            Op::Projection => "projection",
        }
    }
}

impl FromStr for Op {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "scale" => Ok(Op::Scale),
            "reflect" => Ok(Op::Reflect),
            "rotate" => Ok(Op::Rotate),
            "shear" => Ok(Op::Shear),
            "translate" => Ok(Op::Translate),
            "projection" => Ok(Op::Projection),
            _ => Err(format!(
                "unknown operation {s:?}, expected one of scale, reflect, rotate, shear, translate, projection"
            )),
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct AxisArg(Axis);

impl FromStr for AxisArg {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "x" | "X" => Ok(AxisArg(Axis::X)),
            "y" | "Y" => Ok(AxisArg(Axis::Y)),
            _ => Err(format!("unknown axis {s:?}, expected x or y")),
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct MatrixArg([[f64; 3]; 3]);

impl FromStr for MatrixArg {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let values = s
            .split(',')
            .map(|v| v.trim().parse::<f64>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| format!("invalid matrix {s:?}: {e}"))?;

        if values.len() != 9 {
            return Err(format!(
                "a matrix needs 9 comma separated values, got {}",
                values.len()
            ));
        }

        let mut rows = [[0.0; 3]; 3];
        for (i, v) in values.into_iter().enumerate() {
            rows[i / 3][i % 3] = v;
        }
        Ok(MatrixArg(rows))
    }
}

#[derive(FromArgs)]
/// Apply a geometric transformation to images and write the results
struct Args {
    /// path to an input image, may be repeated
    #[argh(option, short = 'i')]
    image_path: Vec<PathBuf>,

    /// directory where the transformed images are written
    #[argh(option, short = 'o', default = "PathBuf::from(\".\")")]
    output_dir: PathBuf,

    /// operation: scale, reflect, rotate, shear, translate or projection
    #[argh(option, default = "Op::Rotate")]
    op: Op,

    /// rotation angle in degrees, counter-clockwise
    #[argh(option, default = "30.0")]
    degrees: f64,

    /// axis used by reflect and shear: x or y
    #[argh(option, default = "AxisArg(Axis::X)")]
    axis: AxisArg,

    /// shear factor
    #[argh(option, default = "0.5")]
    factor: f64,

    /// target height for scale, half of the source when omitted
    #[argh(option)]
    height: Option<usize>,

    /// target width for scale, half of the source when omitted
    #[argh(option)]
    width: Option<usize>,

    /// horizontal shift for translate
    #[argh(option)]
    dx: Option<f64>,

    /// vertical shift for translate
    #[argh(option)]
    dy: Option<f64>,

    /// projection matrix as nine comma separated row-major values
    #[argh(option)]
    matrix: Option<MatrixArg>,

    /// use one of the four preset projection matrices (1-4)
    #[argh(option)]
    preset: Option<usize>,

    /// translate, rotate by -20 degrees and scale to half, in sequence
    #[argh(switch)]
    chain: bool,
}

impl Args {
    // a missing side falls back to half of the source, like the default
    fn dimensions(&self, src: ImageSize) -> Option<Dimensions> {
        match (self.height, self.width) {
            (None, None) => None,
            (height, width) => Some(Dimensions {
                height: height.unwrap_or((src.height / 2).max(1)),
                width: width.unwrap_or((src.width / 2).max(1)),
            }),
        }
    }

    fn translation(&self) -> Option<Translation> {
        match (self.dx, self.dy) {
            (None, None) => None,
            (dx, dy) => Some(Translation {
                dx: dx.unwrap_or(0.0),
                dy: dy.unwrap_or(0.0),
            }),
        }
    }

    fn projection(&self) -> Result<[[f64; 3]; 3], String> {
        match (self.matrix, self.preset) {
            (Some(MatrixArg(rows)), None) => Ok(rows),
            (None, Some(preset)) => PRESETS
                .get(preset.wrapping_sub(1))
                .copied()
                .ok_or_else(|| format!("preset must be between 1 and 4, got {preset}")),
            (None, None) => Err("projection needs --matrix or --preset".to_string()),
            (Some(_), Some(_)) => Err("--matrix and --preset are exclusive".to_string()),
        }
    }
}

fn apply<const C: usize>(image: &Image<u8, C>, args: &Args) -> Result<Image<u8, C>, WarpError> {
    if args.chain {
        // the final scale targets half of the input, not of the rotated canvas
        let src = image.size();
        let shifted = ops::translate(image, args.translation())?;
        let rotated = ops::rotate(&shifted, -20.0)?;
        return ops::scale(
            &rotated,
            Some(Dimensions {
                height: (src.height / 2).max(1),
                width: (src.width / 2).max(1),
            }),
        );
    }

    match args.op {
        Op::Scale => ops::scale(image, args.dimensions(image.size())),
        Op::Reflect => ops::reflect(image, args.axis.0),
        Op::Rotate => ops::rotate(image, args.degrees),
        Op::Shear => ops::shear(image, args.axis.0, args.factor),
        Op::Translate => ops::translate(image, args.translation()),
        Op::Projection => {
            let rows = args.projection().map_err(WarpError::InvalidParameter)?;
            ops::projection(image, rows)
        }
    }
}

fn output_path(output_dir: &Path, name: &str, extension: &str, label: &str) -> PathBuf {
    let extension = if extension.is_empty() { "png" } else { extension };
    output_dir.join(format!("{name}_{label}.{extension}"))
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let args: Args = argh::from_env();

    if args.image_path.is_empty() {
        return Err("at least one --image-path is required".into());
    }

    std::fs::create_dir_all(&args.output_dir)?;
    let label = if args.chain { "chain" } else { args.op.name() };

    for image_path in &args.image_path {
        let image = F::read_image_any(image_path)?;
        log::info!("loaded {} ({})", image_path.display(), image.size());

        let output = match &image {
            GenericImage::Mono8(img) => GenericImage::Mono8(apply(img, &args)?),
            GenericImage::Rgb8(img) => GenericImage::Rgb8(apply(img, &args)?),
            GenericImage::Rgba8(img) => GenericImage::Rgba8(apply(img, &args)?),
        };

        let (name, extension) = match &output {
            GenericImage::Mono8(img) => (img.name(), img.extension()),
            GenericImage::Rgb8(img) => (img.name(), img.extension()),
            GenericImage::Rgba8(img) => (img.name(), img.extension()),
        };
        let out_path = output_path(&args.output_dir, name, extension, label);

        F::write_image(&out_path, &output)?;
        log::info!("wrote {} ({})", out_path.display(), output.size());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_matrix() {
        let MatrixArg(rows) = "1, 0, 2, 0, 1, 3, 0, 0, 1".parse().unwrap();
        assert_eq!(rows, [[1.0, 0.0, 2.0], [0.0, 1.0, 3.0], [0.0, 0.0, 1.0]]);
        assert!("1,2,3".parse::<MatrixArg>().is_err());
        assert!("1,2,3,4,5,6,7,8,x".parse::<MatrixArg>().is_err());
    }

    #[test]
    fn parse_op() {
        assert_eq!("Rotate".parse::<Op>(), Ok(Op::Rotate));
        assert_eq!("projection".parse::<Op>(), Ok(Op::Projection));
        assert!("blur".parse::<Op>().is_err());
    }

    #[test]
    fn partial_dimensions_fall_back_to_half() {
        let args = Args::from_args(&["transform_images"], &["--op", "scale", "--width", "10"])
            .unwrap();
        let d = args.dimensions([40, 30].into()).unwrap();
        assert_eq!(d, Dimensions { height: 15, width: 10 });
    }

    #[test]
    fn projection_presets() {
        let args =
            Args::from_args(&["transform_images"], &["--op", "projection", "--preset", "3"])
                .unwrap();
        assert_eq!(args.projection(), Ok(PRESETS[2]));

        let args =
            Args::from_args(&["transform_images"], &["--op", "projection", "--preset", "0"])
                .unwrap();
        assert!(args.projection().is_err());

        let args = Args::from_args(&["transform_images"], &["--op", "projection"]).unwrap();
        assert!(args.projection().is_err());
    }

    #[test]
    fn chain_scales_to_half_of_the_input() -> Result<(), WarpError> {
        let args = Args::from_args(&["transform_images"], &["--chain"]).unwrap();
        let image = Image::<u8, 3>::from_size_val([1294 / 8, 1270 / 8].into(), 90)?;

        let out = apply(&image, &args)?;
        assert_eq!(
            out.size(),
            ImageSize {
                width: 1294 / 16,
                height: 1270 / 16
            }
        );
        Ok(())
    }

    #[test]
    fn output_naming() {
        let dir = Path::new("out");
        assert_eq!(
            output_path(dir, "Image1", "png", "rotate"),
            PathBuf::from("out/Image1_rotate.png")
        );
        assert_eq!(
            output_path(dir, "scan", "", "scale"),
            PathBuf::from("out/scan_scale.png")
        );
    }
}
